//! End-to-end scenarios across keys, sealing, proofs, sessions, and permissions.

use std::sync::Once;
use std::time::Duration;

use konbini::api::OrderBundleResponse;
use konbini::auth::{
    check_expiry, ensure_valid, AuthError, CredentialState, CredentialStore, FileCredentialStore,
};
use konbini::core::{create_challenge, ingredient, ChunkedCipher, KeyPair};
use konbini::perms::{grant, BundleAccess, Permission, PermissionSet};
use konbini::transport::memory::ScriptedTransport;
use konbini::{Bento, Credentials, Session};
use konbini_testkit::fixtures::{
    expired_token, fresh_credentials, fresh_token, shared_keys, stale_pair,
};
use konbini_testkit::generators::{entries, permission_set, plaintext};
use proptest::prelude::*;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

#[test]
fn test_seal_single_block_secret() {
    let keys = KeyPair::generate().unwrap();
    let cipher = ChunkedCipher::default();
    let secret = b"DB_PASSWORD=s3cr3t";

    let sealed = cipher.seal(keys.public_key(), secret).unwrap();
    assert_eq!(sealed.len(), 256);
    assert_eq!(sealed.block_count(), 1);

    let opened = cipher.open(&keys, sealed.as_bytes()).unwrap();
    assert_eq!(opened.as_slice(), secret);
}

#[test]
fn test_seal_multi_block_payloads() {
    let keys = shared_keys();
    let cipher = ChunkedCipher::default();
    assert_eq!(cipher.capacity(keys.public_key()), 245);

    // 490 bytes fill two blocks exactly; 500 spill into a third
    for (len, blocks) in [(490usize, 2usize), (500, 3)] {
        let payload: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
        let sealed = cipher.seal(keys.public_key(), &payload).unwrap();
        assert_eq!(sealed.block_count(), blocks, "{len} bytes");
        assert_eq!(sealed.len(), blocks * 256, "{len} bytes");

        let opened = cipher.open(keys, sealed.as_bytes()).unwrap();
        assert_eq!(opened.as_slice(), payload.as_slice());
    }
}

#[test]
fn test_ingredient_file_roundtrip() {
    let entries = ingredient::parse(b"A=1\n# comment\nB=2\n").unwrap();
    let pairs: Vec<_> = entries.iter().map(|e| (e.name(), e.value())).collect();
    assert_eq!(pairs, vec![("A", &b"1"[..]), ("B", &b"2"[..])]);

    let rendered = ingredient::render(&entries);
    assert_eq!(ingredient::parse(&rendered).unwrap(), entries);
}

#[test]
fn test_expired_access_token_renews_once() {
    let pair = stale_pair();
    assert!(check_expiry(pair.access_token()).unwrap());

    let renewed_token = fresh_token();
    let mut calls = 0;
    let renewal = ensure_valid(&pair, |_| {
        calls += 1;
        Ok(renewed_token.clone())
    })
    .unwrap();

    assert_eq!(calls, 1);
    assert!(renewal.needs_persist());
    assert_eq!(renewal.pair().access_token(), renewed_token);
}

#[test]
fn test_partial_grant() {
    let held = PermissionSet::from([Permission::Write, Permission::Share]);
    let requested = PermissionSet::from([Permission::Write, Permission::Delete]);

    let outcome = grant(&held, &requested).unwrap();
    assert_eq!(outcome.granted, PermissionSet::from([Permission::Write]));
    assert_eq!(outcome.rejected, PermissionSet::from([Permission::Delete]));
}

#[test]
fn test_bundle_prepare_fill_order() {
    let keys = KeyPair::import_private(shared_keys().export_private().unwrap().as_bytes()).unwrap();
    let bento = Bento::new(keys, ChunkedCipher::default());

    let prepared = bento.prepare("api", b"").unwrap();
    let json = serde_json::to_value(&prepared).unwrap();
    assert!(json.get("ingridients").is_none());
    assert!(json.get("pub_key").is_some());

    let bento = bento.with_bento_id("b-7");
    let filled = bento.fill(b"API_KEY=abc123\nSECRET=xyz\n").unwrap();
    filled.proof.verify(bento.keys().public_key()).unwrap();

    // the service stores the ingredients and echoes them back on order
    let order = OrderBundleResponse {
        message: "bento ordered".into(),
        ingredients: filled.ingredients,
    };
    assert_eq!(
        bento.unpack(&order).unwrap().as_slice(),
        b"API_KEY=abc123\nSECRET=xyz\n"
    );
}

#[test]
fn test_bundle_access_delegation() {
    let mut access = BundleAccess::new("owner@example.com");
    access
        .share(
            "owner@example.com",
            "lead@example.com",
            &"write,share,revoke_share".parse::<PermissionSet>().unwrap(),
        )
        .unwrap();

    let outcome = access
        .share(
            "lead@example.com",
            "dev@example.com",
            &PermissionSet::from([Permission::All]),
        )
        .unwrap();
    assert!(!outcome.is_complete());
    assert!(outcome.granted.is_subset(&access.permissions_of("lead@example.com")));

    access
        .revoke_share("lead@example.com", "dev@example.com", &PermissionSet::from([Permission::All]))
        .unwrap();
    assert!(access.permissions_of("dev@example.com").is_empty());
}

#[test]
fn test_challenges_do_not_repeat() {
    let a = create_challenge().unwrap();
    let b = create_challenge().unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_renewal() {
    init_tracing();
    let renewed = fresh_token();
    let store = konbini::auth::MemoryCredentialStore::with(Credentials::new(
        expired_token(),
        fresh_token(),
    ));
    let transport = ScriptedTransport::new()
        .with_latency(Duration::from_millis(50))
        .reply(Ok(renewed.clone()));
    let session = Session::resume(transport, store).unwrap();

    let (a, b, c) = tokio::join!(
        session.access_token(),
        session.access_token(),
        session.access_token()
    );

    assert_eq!(a.unwrap(), renewed);
    assert_eq!(b.unwrap(), renewed);
    assert_eq!(c.unwrap(), renewed);
    assert_eq!(session.transport().calls(), 1);
    assert_eq!(session.store().save_count(), 1);
}

#[tokio::test]
async fn test_fresh_session_skips_transport() {
    init_tracing();
    let credentials = fresh_credentials();
    let session = Session::sign_in(
        credentials.clone(),
        ScriptedTransport::new(),
        konbini::auth::MemoryCredentialStore::new(),
    )
    .unwrap();

    assert_eq!(session.access_token().await.unwrap(), credentials.access_token);
    assert_eq!(session.transport().calls(), 0);
    assert_eq!(session.store().save_count(), 1);
}

#[tokio::test]
async fn test_file_backed_session_lifecycle() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::in_dir(dir.path().join("konbini"));

    // no credentials yet
    let err = Session::resume(ScriptedTransport::new(), store.clone())
        .err()
        .unwrap();
    assert!(err.is_session_fatal());

    let session = Session::sign_in(
        Credentials::new(expired_token(), fresh_token()).with_email("dev@example.com"),
        ScriptedTransport::new().reply(Ok(fresh_token())),
        store.clone(),
    )
    .unwrap();
    assert_eq!(session.state().await.unwrap(), CredentialState::AccessExpired);

    let token = session.access_token().await.unwrap();
    assert_eq!(store.load().unwrap().access_token, token);

    // a second session over the same file sees the renewed token
    let resumed = Session::resume(ScriptedTransport::new(), store.clone()).unwrap();
    assert_eq!(resumed.access_token().await.unwrap(), token);
    assert_eq!(resumed.transport().calls(), 0);

    resumed.sign_out().await.unwrap();
    assert!(matches!(store.load(), Err(AuthError::NotAuthenticated)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_seal_open_roundtrip(data in plaintext(800)) {
        let keys = shared_keys();
        let cipher = ChunkedCipher::default();
        let sealed = cipher.seal(keys.public_key(), &data).unwrap();

        let blocks = data.len().max(1).div_ceil(245);
        prop_assert_eq!(sealed.len(), blocks * 256);
        let opened = cipher.open(keys, sealed.as_bytes()).unwrap();
        prop_assert_eq!(opened.as_slice(), data.as_slice());
    }

    #[test]
    fn prop_bundle_unpack_restores_file(entries in entries(6)) {
        let keys = KeyPair::import_private(shared_keys().export_private().unwrap().as_bytes()).unwrap();
        let bento = Bento::new(keys, ChunkedCipher::default()).with_bento_id("b-prop");
        let text = ingredient::render(&entries);

        let order = OrderBundleResponse {
            message: String::new(),
            ingredients: bento.fill(&text).unwrap().ingredients,
        };
        let unpacked = bento.unpack(&order).unwrap();
        prop_assert_eq!(unpacked.as_slice(), text.as_slice());
    }

    #[test]
    fn prop_delegated_share_is_bounded(lead in permission_set(), requested in permission_set()) {
        let mut lead = lead;
        lead.insert(Permission::Share);

        let mut access = BundleAccess::new("owner@example.com");
        access.share("owner@example.com", "lead@example.com", &lead).unwrap();
        let _ = access.share("lead@example.com", "dev@example.com", &requested);

        let dev = access.permissions_of("dev@example.com");
        prop_assert!(dev.is_subset(&access.permissions_of("lead@example.com")));
        prop_assert!(dev.is_subset(&requested));
    }
}
