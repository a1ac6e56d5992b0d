mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{config, mount, FakeHost, FakeProvider, FakeSource};
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use lib_session::{AppError, ConnectionStatus, Host, ManualScheduler, ProviderSource, WalletSession};
use serde_json::json;
use shared::ProviderEventKind;

#[test]
fn test_listeners_attached_once_at_mount() {
    let provider = FakeProvider::metamask();
    let _h = mount(Some(Rc::clone(&provider)));
    assert_eq!(provider.listener_count(), 2);
}

#[test]
fn test_no_listeners_without_provider() {
    let h = mount(None);
    let provider = FakeProvider::metamask();
    h.source.install(Rc::clone(&provider));

    // The probe sees the late provider; listeners are only attached at startup.
    assert!(h.session.open_modal().provider_capable);
    assert_eq!(provider.listener_count(), 0);
}

#[test]
fn test_emptied_account_list_disconnects() {
    let provider = FakeProvider::metamask();
    let h = mount(Some(Rc::clone(&provider)));

    provider.emit_accounts(&["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"]);
    assert_eq!(h.session.snapshot().status(), ConnectionStatus::Connected);

    provider.emit_accounts(&[]);
    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.status(), ConnectionStatus::Disconnected);
    assert_eq!(snapshot.address(), None);
}

#[test]
fn test_account_switches_last_writer_wins() {
    let provider = FakeProvider::metamask();
    let h = mount(Some(Rc::clone(&provider)));

    provider.emit_accounts(&["0xAA"]);
    provider.emit_accounts(&["0xBB"]);

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.status(), ConnectionStatus::Connected);
    assert_eq!(snapshot.address(), Some("0xBB"));
    assert_eq!(h.session.navbar_label(), "0xBB");
}

#[test]
fn test_chain_change_reloads_and_keeps_address() {
    let provider = FakeProvider::metamask();
    let h = mount(Some(Rc::clone(&provider)));
    provider.emit_accounts(&["0x01"]);

    provider.emit_chain("0x89");

    assert_eq!(h.host.reloads.get(), 1);
    assert_eq!(h.session.snapshot().address(), Some("0x01"));
}

#[test]
fn test_chain_change_while_connecting_reloads_immediately() {
    let provider = FakeProvider::metamask();
    let _answer = provider.defer();
    let h = mount(Some(Rc::clone(&provider)));

    let mut pool = LocalPool::new();
    let session = Rc::clone(&h.session);
    let _attempt = pool
        .spawner()
        .spawn_local_with_handle(async move { session.sign_in().await })
        .unwrap();
    pool.run_until_stalled();
    assert_eq!(h.session.snapshot().status(), ConnectionStatus::Connecting);

    provider.emit_chain("0x1");
    assert_eq!(h.host.reloads.get(), 1);
}

#[test]
fn test_malformed_payloads_are_dropped() {
    let provider = FakeProvider::metamask();
    let h = mount(Some(Rc::clone(&provider)));
    provider.emit_accounts(&["0x01"]);
    let before = h.session.snapshot();

    provider.emit(ProviderEventKind::AccountsChanged, json!("0x02"));
    provider.emit(ProviderEventKind::AccountsChanged, json!([42]));
    provider.emit(ProviderEventKind::ChainChanged, json!({ "chainId": "0x1" }));

    assert_eq!(h.session.snapshot(), before);
    assert_eq!(h.host.reloads.get(), 0);
}

#[test]
fn test_subscribers_see_every_provider_change() {
    let provider = FakeProvider::metamask();
    let h = mount(Some(Rc::clone(&provider)));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = h
        .session
        .subscribe(move |session| sink.borrow_mut().push(session.address().map(str::to_string)));

    provider.emit_accounts(&["0xAA"]);
    provider.emit_accounts(&["0xAA"]);
    provider.emit_accounts(&[]);
    h.session.unsubscribe(id);
    provider.emit_accounts(&["0xCC"]);

    assert_eq!(*seen.borrow(), vec![Some("0xAA".to_string()), None]);
}

#[test]
fn test_teardown_removes_listeners() {
    let provider = FakeProvider::metamask();
    let h = mount(Some(Rc::clone(&provider)));

    h.session.teardown();
    assert_eq!(provider.listener_count(), 0);

    provider.emit_accounts(&["0xAA"]);
    assert_eq!(h.session.snapshot().status(), ConnectionStatus::Disconnected);

    // Idempotent
    h.session.teardown();
}

#[test]
fn test_listeners_removed_from_original_provider_after_swap() {
    let original = FakeProvider::metamask();
    let h = mount(Some(Rc::clone(&original)));

    let replacement = FakeProvider::metamask();
    h.source.install(Rc::clone(&replacement));
    drop(h);

    assert_eq!(original.listener_count(), 0);
    assert_eq!(replacement.listener_count(), 0);
}

#[test]
fn test_failed_registration_rolls_back() {
    let provider = FakeProvider::metamask();
    provider.refuse_listener(ProviderEventKind::ChainChanged);
    let source = FakeSource::with(Some(Rc::clone(&provider)));

    let result = WalletSession::mount(
        config(),
        source as Rc<dyn ProviderSource>,
        Rc::new(FakeHost::default()) as Rc<dyn Host>,
        Rc::new(ManualScheduler::new()),
    );

    assert!(matches!(result, Err(AppError::Provider(_))));
    assert_eq!(provider.listener_count(), 0);
}

#[test]
fn test_disconnect_requested_from_any_state() {
    let provider = FakeProvider::metamask();
    let h = mount(Some(Rc::clone(&provider)));
    provider.emit_accounts(&["0x01"]);

    let snapshot = h.session.disconnect();
    assert_eq!(snapshot.status(), ConnectionStatus::Disconnected);
    assert_eq!(h.session.navbar_label(), "Connect Wallet");
}
