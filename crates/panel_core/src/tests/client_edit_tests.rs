use super::*;
use crate::{
    navigation::{Navigator, CLIENT_EDIT},
    test_support::{harness, RestCall, ScriptedRest, PANEL_KEY},
    ClientListController,
};
use shared::protocol::{CreateClientResponse, RoutesResponse, StatusResponse};

fn persisted(id: i64, api_key: &str) -> Client {
    Client {
        id: ClientId(id),
        api_key: api_key.to_string(),
        api_secret: "secret".to_string(),
        ..Client::draft()
    }
}

fn created(id: i64) -> CreateClientResponse {
    CreateClientResponse {
        status: Some("success".into()),
        id: Some(ClientId(id)),
    }
}

fn status(value: &str) -> StatusResponse {
    StatusResponse {
        status: Some(value.into()),
    }
}

fn update_calls(calls: &[RestCall]) -> usize {
    calls
        .iter()
        .filter(|call| matches!(call, RestCall::Update(..)))
        .count()
}

#[tokio::test]
async fn init_takes_current_draft_and_loads_routes() {
    let h = harness(
        ScriptedRest::new().with_routes(Ok(RoutesResponse {
            routes: vec![Route {
                route: "/v1/clients".into(),
                verb: "GET".into(),
            }],
        })),
        true,
    );
    h.ctx.storage.set_current(persisted(3, "key-3"));

    let mut editor = ClientEditController::new(h.ctx.clone());
    editor.init().await;

    assert_eq!(editor.current.id, ClientId(3));
    assert_eq!(editor.original_key, "key-3");
    assert_eq!(
        editor.permission_options(),
        vec![(
            Permission::new("/v1/clients", "GET"),
            "[GET] /v1/clients".to_string()
        )]
    );
}

#[tokio::test]
async fn missing_route_catalog_leaves_editor_usable() {
    let h = harness(ScriptedRest::new(), true);
    let mut editor = ClientEditController::new(h.ctx.clone());
    editor.init().await;

    assert!(editor.routes.is_empty());
    assert!(editor.warning.is_none());
    assert!(editor.current.is_unsaved());
}

#[test]
fn permission_option_puts_verb_first() {
    assert_eq!(
        ClientEditController::format_permission_option("/v1/routes", "POST"),
        "[POST] /v1/routes"
    );
}

#[tokio::test]
async fn first_permission_initializes_the_list() {
    let h = harness(ScriptedRest::new(), true);
    h.ctx.storage.set_current(Client::draft());
    let mut editor = ClientEditController::new(h.ctx.clone());
    assert!(editor.current.permissions.is_none());

    editor.add_permission(Permission::new("/v1/clients", "GET"));

    assert_eq!(editor.current.permissions().len(), 1);
    assert_eq!(
        h.ctx.storage.current().map(|c| c.permissions().len()),
        Some(1)
    );
}

#[tokio::test]
async fn delete_permission_removes_by_index() {
    let h = harness(ScriptedRest::new(), true);
    let mut editor = ClientEditController::new(h.ctx.clone());
    editor.add_permission(Permission::new("/a", "GET"));
    editor.add_permission(Permission::new("/b", "PUT"));

    assert_eq!(
        editor.delete_permission(0),
        Some(Permission::new("/a", "GET"))
    );
    assert_eq!(editor.current.permissions(), &[Permission::new("/b", "PUT")]);
    assert_eq!(editor.delete_permission(5), None);
}

#[tokio::test]
async fn random_credentials_replace_draft_values() {
    let h = harness(ScriptedRest::new(), true);
    let mut editor =
        ClientEditController::new(h.ctx.clone()).with_token_generator(TokenGenerator::seeded(3));

    let key = editor.create_random_api_key().to_string();
    let secret = editor.create_random_api_secret().to_string();

    assert_eq!(editor.current.api_key, key);
    assert_eq!(key.len(), 36);
    assert_eq!(&key[14..15], "4");
    assert!(matches!(&key[19..20], "8" | "9" | "a" | "b"));
    assert_eq!(editor.current.api_secret, secret);
    assert_eq!(secret.len(), 12);
}

#[tokio::test]
async fn saving_new_draft_creates_and_stores_it_once() {
    let h = harness(ScriptedRest::new().with_create(Ok(created(12))), true);
    let mut list = ClientListController::new(h.ctx.clone());
    list.create_new_client();
    assert_eq!(h.navigator.current_path(), CLIENT_EDIT);

    let mut editor = ClientEditController::new(h.ctx.clone());
    editor.current.api_key = "fresh".into();
    editor.add_permission(Permission::new("/v1/clients", "GET"));

    let outcome = editor.save_client().await;

    assert_eq!(outcome, SaveOutcome::Created(ClientId(12)));
    assert_eq!(editor.current.id, ClientId(12));
    assert_eq!(h.navigator.current_path(), CLIENT_LIST);

    let stored = h.ctx.storage.clients();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.iter().filter(|c| c.id == ClientId(12)).count(), 1);

    let calls = h.rest.calls();
    assert_eq!(calls.len(), 1);
    let RestCall::Create(fields) = &calls[0] else {
        panic!("expected create call, got {calls:?}");
    };
    assert_eq!(fields.api_key, "fresh");
    assert_eq!(fields.permissions, r#"[{"route":"/v1/clients","verb":"GET"}]"#);
}

#[tokio::test]
async fn refused_create_keeps_draft_and_warns() {
    let h = harness(
        ScriptedRest::new().with_create(Ok(CreateClientResponse {
            status: Some("failure".into()),
            id: None,
        })),
        true,
    );
    let mut editor = ClientEditController::new(h.ctx.clone());

    let outcome = editor.save_client().await;

    assert!(matches!(outcome, SaveOutcome::Failed(_)));
    assert!(editor.current.is_unsaved());
    assert_eq!(
        editor.warning.as_deref(),
        Some("<strong>Warning:</strong> Save-Operation failed, for unknown reason!")
    );
    assert_eq!(h.navigator.current_path(), CLIENT_LIST);
    assert!(h.ctx.storage.is_empty());
}

#[tokio::test]
async fn unreachable_create_warns_and_still_navigates() {
    let h = harness(
        ScriptedRest::new().with_create(Err(RestFailure::http(503, "maintenance"))),
        true,
    );
    let mut editor = ClientEditController::new(h.ctx.clone());

    editor.save_client().await;

    assert_eq!(
        editor.warning.as_deref(),
        Some("<strong>Warning:</strong> Save-Operation failed, could not contact REST-Interface! (Status: 503, Response: maintenance)")
    );
    assert_eq!(h.navigator.current_path(), CLIENT_LIST);
}

#[tokio::test]
async fn update_is_keyed_by_id_without_confirmation() {
    let h = harness(ScriptedRest::new().with_update(Ok(status("success"))), true);
    h.ctx.storage.set_clients(vec![persisted(7, "old")]);
    h.ctx.storage.set_current(persisted(7, "old"));

    let mut editor = ClientEditController::new(h.ctx.clone());
    editor.current.api_key = "new".into();
    let outcome = editor.save_client().await;

    assert_eq!(outcome, SaveOutcome::Updated);
    assert!(h.dialogs.asked().is_empty());
    let calls = h.rest.calls();
    let RestCall::Update(id, fields) = &calls[0] else {
        panic!("expected update call, got {calls:?}");
    };
    assert_eq!(*id, ClientId(7));
    assert_eq!(fields.api_key, "new");
    assert_eq!(h.ctx.storage.clients()[0].api_key, "new");
    assert_eq!(h.navigator.current_path(), CLIENT_LIST);
}

#[tokio::test]
async fn changing_panel_key_requires_confirmation() {
    let h = harness(ScriptedRest::new().with_update(Ok(status("success"))), true);
    h.ctx.storage.set_current(persisted(1, PANEL_KEY));

    let mut editor = ClientEditController::new(h.ctx.clone());
    editor.create_random_api_key();
    assert!(editor.changes_panel_key());

    let outcome = editor.save_client().await;

    assert_eq!(outcome, SaveOutcome::Updated);
    let asked = h.dialogs.asked();
    assert_eq!(asked.len(), 1);
    assert_eq!(asked[0].0, UPDATE_PANEL_TITLE);
    assert_eq!(update_calls(&h.rest.calls()), 1);
}

#[tokio::test]
async fn dismissed_panel_key_change_issues_nothing() {
    let h = harness(ScriptedRest::new().with_update(Ok(status("success"))), false);
    h.ctx.storage.set_current(persisted(1, PANEL_KEY));

    let mut editor = ClientEditController::new(h.ctx.clone());
    editor.current.api_key = "other".into();
    let outcome = editor.save_client().await;

    assert_eq!(outcome, SaveOutcome::Cancelled);
    assert!(h.rest.calls().is_empty());
    assert_eq!(h.navigator.visited(), vec![CLIENT_LIST.to_string()]);
}

#[tokio::test]
async fn keeping_panel_key_skips_confirmation() {
    let h = harness(ScriptedRest::new().with_update(Ok(status("success"))), false);
    h.ctx.storage.set_current(persisted(1, PANEL_KEY));

    let mut editor = ClientEditController::new(h.ctx.clone());
    editor.current.oauth2_redirection_uri = "https://app.example.org/cb".into();
    let outcome = editor.save_client().await;

    assert_eq!(outcome, SaveOutcome::Updated);
    assert!(h.dialogs.asked().is_empty());
}

#[tokio::test]
async fn adopting_panel_key_skips_confirmation() {
    let h = harness(ScriptedRest::new().with_update(Ok(status("success"))), false);
    h.ctx.storage.set_current(persisted(2, "other"));

    let mut editor = ClientEditController::new(h.ctx.clone());
    editor.current.api_key = PANEL_KEY.into();
    let outcome = editor.save_client().await;

    assert_eq!(outcome, SaveOutcome::Updated);
    assert!(h.dialogs.asked().is_empty());
    assert_eq!(update_calls(&h.rest.calls()), 1);
}

#[tokio::test]
async fn refused_update_sets_warning() {
    let h = harness(ScriptedRest::new().with_update(Ok(status("denied"))), true);
    h.ctx.storage.set_current(persisted(4, "k"));

    let mut editor = ClientEditController::new(h.ctx.clone());
    let outcome = editor.save_client().await;

    assert!(matches!(outcome, SaveOutcome::Failed(_)));
    assert_eq!(
        editor.warning.as_deref(),
        Some("<strong>Warning:</strong> Save-Operation failed, for unknown reason!")
    );
    assert_eq!(h.navigator.current_path(), CLIENT_LIST);
}

#[tokio::test]
async fn go_back_returns_to_list_without_saving() {
    let h = harness(ScriptedRest::new(), true);
    let editor = ClientEditController::new(h.ctx.clone());
    editor.go_back();

    assert_eq!(h.navigator.current_path(), CLIENT_LIST);
    assert!(h.rest.calls().is_empty());
}
