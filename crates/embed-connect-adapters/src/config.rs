#[derive(Debug, Clone)]
pub struct EmbedAdapterConfig {
    pub popup_target: String,
    pub popup_features: String,
    pub frame_element_id: String,
    pub frame_class_name: String,
    pub storage_key_prefix: String,
}

impl Default for EmbedAdapterConfig {
    fn default() -> Self {
        Self {
            popup_target: "_blank".to_owned(),
            popup_features: "width=400,height=700,top=100,left=100".to_owned(),
            frame_element_id: "crossmintIframe".to_owned(),
            frame_class_name: "crossmintIframe".to_owned(),
            storage_key_prefix: "embed-connect:account".to_owned(),
        }
    }
}

impl EmbedAdapterConfig {
    /// Overrides defaults from `EMBED_CONNECT_*` environment variables. On
    /// wasm there is no process environment and the defaults are returned.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_var("EMBED_CONNECT_POPUP_TARGET") {
            config.popup_target = v;
        }
        if let Some(v) = env_var("EMBED_CONNECT_POPUP_FEATURES") {
            config.popup_features = v;
        }
        if let Some(v) = env_var("EMBED_CONNECT_FRAME_ID") {
            config.frame_element_id = v;
        }
        if let Some(v) = env_var("EMBED_CONNECT_FRAME_CLASS") {
            config.frame_class_name = v;
        }
        if let Some(v) = env_var("EMBED_CONNECT_STORAGE_PREFIX") {
            config.storage_key_prefix = v;
        }
        config
    }

    pub fn storage_key(&self, chain: &str) -> String {
        format!("{}:{chain}", self.storage_key_prefix)
    }
}

fn env_var(key: &str) -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = key;
        None
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}
