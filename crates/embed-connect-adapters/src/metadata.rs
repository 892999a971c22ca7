use async_trait::async_trait;

use embed_connect_core::{AppMetadata, PortError, SiteMetadata, SiteMetadataPort};

/// Site metadata taken from the app metadata, with fixed fallbacks for the
/// fields the host did not provide.
#[derive(Debug, Clone, Default)]
pub struct StaticSiteMetadataAdapter {
    pub fallback: SiteMetadata,
}

#[async_trait(?Send)]
impl SiteMetadataPort for StaticSiteMetadataAdapter {
    async fn build(&self, app: &AppMetadata) -> Result<SiteMetadata, PortError> {
        Ok(merge(app, &self.fallback))
    }
}

fn merge(app: &AppMetadata, fallback: &SiteMetadata) -> SiteMetadata {
    SiteMetadata {
        name: app.name.clone().or_else(|| fallback.name.clone()),
        url: app.url.clone().or_else(|| fallback.url.clone()),
        icon: app.icon.clone().or_else(|| fallback.icon.clone()),
        description: app
            .description
            .clone()
            .or_else(|| fallback.description.clone()),
    }
}

/// Reads the document title, location origin and favicon for anything the
/// app metadata leaves empty.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct BrowserSiteMetadataAdapter;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl SiteMetadataPort for BrowserSiteMetadataAdapter {
    async fn build(&self, app: &AppMetadata) -> Result<SiteMetadata, PortError> {
        use wasm_bindgen::JsCast;

        let window =
            web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| PortError::Transport("missing document".to_owned()))?;

        let title = document.title();
        let origin = window.location().origin().ok();
        let icon = document
            .query_selector("link[rel~='icon']")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<web_sys::HtmlLinkElement>().ok())
            .map(|link| link.href())
            .filter(|href| !href.is_empty());

        let fallback = SiteMetadata {
            name: (!title.is_empty()).then_some(title),
            url: origin,
            icon,
            description: None,
        };
        Ok(merge(app, &fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_metadata_wins_over_fallback() {
        let app = AppMetadata {
            name: Some("Gallery".to_owned()),
            description: None,
            icon: None,
            url: Some("https://gallery.example".to_owned()),
        };
        let fallback = SiteMetadata {
            name: Some("Untitled".to_owned()),
            url: Some("https://fallback.example".to_owned()),
            icon: Some("https://fallback.example/favicon.ico".to_owned()),
            description: None,
        };
        let merged = merge(&app, &fallback);
        assert_eq!(merged.name.as_deref(), Some("Gallery"));
        assert_eq!(merged.url.as_deref(), Some("https://gallery.example"));
        assert_eq!(
            merged.icon.as_deref(),
            Some("https://fallback.example/favicon.ico")
        );
        assert_eq!(merged.description, None);
    }
}
