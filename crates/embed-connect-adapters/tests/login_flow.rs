mod common;

use serde_json::json;

use embed_connect_core::{Chain, Outcome, StoragePort};

use common::{
    accounts_granted, after_ms, config, deliver, new_client, posted_count, user_reject,
    TRUSTED_ORIGIN,
};

#[tokio::test(start_paused = true)]
async fn login_resolves_with_granted_account() {
    let client = new_client(config(Chain::Solana));

    let (outcome, _) = tokio::join!(client.login(), async {
        after_ms(250).await;
        deliver(&client, TRUSTED_ORIGIN, accounts_granted("So1anaAcct"));
    });

    assert_eq!(outcome, Outcome::Resolved("So1anaAcct".to_owned()));

    let windows = client.windows.windows().expect("windows");
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].url, "https://staging.crossmint.com/frame");
    assert!(!windows[0].open);
    assert_eq!(windows[0].close_calls, 1);
    // sends at 0ms, 100ms and 200ms; the grant at 250ms stops the loop
    assert_eq!(windows[0].posted.len(), 3);

    let first = &windows[0].posted[0];
    assert_eq!(first.target_origin, "https://staging.crossmint.com/frame");
    assert_eq!(first.message["request"], "crossmint_requestAccounts");
    assert_eq!(first.message["data"]["apiKey"], "sk_test_embed");
    assert_eq!(first.message["data"]["libVersion"], "0.3.1");
    assert_eq!(first.message["data"]["chain"], "solana");
    assert_eq!(first.message["data"]["siteMetadata"]["name"], "Test Gallery");

    assert!(client.frames.frames().expect("frames").is_empty());
    assert_eq!(
        client
            .storage
            .account_for_chain(&Chain::Solana)
            .expect("storage"),
        Some("So1anaAcct".to_owned())
    );
    assert_eq!(client.hub.listener_count().expect("listeners"), 0);
}

#[tokio::test(start_paused = true)]
async fn login_rejection_waits_for_remote_to_close() {
    let client = new_client(config(Chain::Solana));

    let (outcome, _) = tokio::join!(client.login(), async {
        after_ms(150).await;
        deliver(&client, TRUSTED_ORIGIN, user_reject());
        after_ms(100).await;
        let windows = client.windows.windows().expect("windows");
        assert!(windows[0].open, "rejection leaves closing to the remote");
        after_ms(70).await;
        client.windows.close_externally(0).expect("close");
    });

    assert_eq!(outcome, Outcome::Rejected);
    assert!(posted_count(&client, 0) >= 3);
    assert_eq!(
        client
            .storage
            .account_for_chain(&Chain::Solana)
            .expect("storage"),
        None
    );
    assert_eq!(client.hub.listener_count().expect("listeners"), 0);
}

#[tokio::test(start_paused = true)]
async fn login_closed_manually_is_unresolved() {
    let client = new_client(config(Chain::Ethereum));

    let (outcome, _) = tokio::join!(client.login(), async {
        after_ms(350).await;
        client.windows.close_externally(0).expect("close");
    });

    assert_eq!(outcome, Outcome::Unresolved);
    assert_eq!(client.windows.windows().expect("windows")[0].close_calls, 0);
    assert_eq!(client.hub.listener_count().expect("listeners"), 0);
}

#[tokio::test(start_paused = true)]
async fn first_terminal_message_wins() {
    let client = new_client(config(Chain::Solana));

    let (outcome, _) = tokio::join!(client.login(), async {
        after_ms(120).await;
        deliver(&client, TRUSTED_ORIGIN, accounts_granted("first"));
        deliver(&client, TRUSTED_ORIGIN, accounts_granted("second"));
    });

    assert_eq!(outcome, Outcome::Resolved("first".to_owned()));
    assert_eq!(client.windows.windows().expect("windows")[0].close_calls, 1);
}

#[tokio::test(start_paused = true)]
async fn grant_after_rejection_does_not_override() {
    let client = new_client(config(Chain::Solana));

    let (outcome, _) = tokio::join!(client.login(), async {
        after_ms(120).await;
        deliver(&client, TRUSTED_ORIGIN, user_reject());
        deliver(&client, TRUSTED_ORIGIN, accounts_granted("late"));
        after_ms(200).await;
        client.windows.close_externally(0).expect("close");
    });

    assert_eq!(outcome, Outcome::Rejected);
}

#[tokio::test(start_paused = true)]
async fn grant_without_account_closes_window_unresolved() {
    let client = new_client(config(Chain::Solana));

    let (outcome, _) = tokio::join!(client.login(), async {
        after_ms(150).await;
        deliver(
            &client,
            TRUSTED_ORIGIN,
            json!({ "request": "crossmint_requestAccounts", "data": {} }),
        );
        after_ms(100).await;
        deliver(&client, TRUSTED_ORIGIN, accounts_granted("late"));
    });

    assert_eq!(outcome, Outcome::Unresolved);
    let windows = client.windows.windows().expect("windows");
    assert!(!windows[0].open);
    assert_eq!(windows[0].close_calls, 1);
    assert_eq!(windows[0].posted.len(), 2);
    assert_eq!(
        client
            .storage
            .account_for_chain(&Chain::Solana)
            .expect("storage"),
        None
    );
}

#[tokio::test(start_paused = true)]
async fn zero_poll_interval_still_yields_between_sends() {
    let mut config = config(Chain::Solana);
    config.poll_interval_ms = 0;
    assert!(config.validate().is_err());
    let client = new_client(config);

    let (outcome, _) = tokio::join!(client.login(), async {
        after_ms(10).await;
        client.windows.close_externally(0).expect("close");
    });

    assert_eq!(outcome, Outcome::Unresolved);
    let posted = posted_count(&client, 0);
    assert!((1..=11).contains(&posted), "posted {posted} times in 10ms");
}

#[tokio::test(start_paused = true)]
async fn blocked_popup_is_unresolved() {
    let client = new_client(config(Chain::Solana).with_auto_connect(500));
    client.windows.fail_opens("popup blocker").expect("configure");

    let outcome = client.login().await;

    assert_eq!(outcome, Outcome::Unresolved);
    assert!(client.frames.frames().expect("frames").is_empty());
}

#[tokio::test(start_paused = true)]
async fn clean_up_clears_stored_accounts() {
    let client = new_client(config(Chain::Polygon));
    client
        .storage
        .store_account("0xabc", &Chain::Polygon)
        .expect("store");

    client.clean_up().expect("clean up");

    assert_eq!(
        client
            .storage
            .account_for_chain(&Chain::Polygon)
            .expect("storage"),
        None
    );
}
