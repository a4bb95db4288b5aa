use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use panel_core::{
    config::load_settings_from, load_settings, navigation::LOGIN, AutoConfirm,
    ClientEditController, ClientListController, Dialogs, HistoryNavigator, LoginController,
    LoginForm, OfflineController, PanelContext, SaveOutcome, TokenGenerator,
};
use shared::domain::{Client, ClientId, Permission};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{plain, TerminalDialogs};

#[derive(Parser, Debug)]
#[command(name = "panel", about = "Manage the OAuth2 clients of a REST interface")]
struct Cli {
    /// Settings file; `panel.toml` in the working directory by default.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    rest_endpoint: Option<String>,
    #[arg(long)]
    username: Option<String>,
    /// Falls back to `PANEL_PASSWORD`.
    #[arg(long)]
    password: Option<String>,
    /// Answer every confirmation with yes.
    #[arg(long)]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered clients.
    List,
    /// Show the permissions the REST interface offers.
    Routes,
    /// Register a new client. Missing key or secret are generated.
    Create {
        #[command(flatten)]
        fields: ClientArgs,
    },
    /// Change an existing client.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ClientArgs,
        #[arg(long)]
        random_key: bool,
        #[arg(long)]
        random_secret: bool,
        /// Position of a permission to drop; may repeat.
        #[arg(long = "drop-permission")]
        drop_permissions: Vec<usize>,
    },
    Delete {
        id: i64,
    },
    GenKey,
    GenSecret,
    /// Check whether the REST interface can be reached.
    Status {
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
}

#[derive(clap::Args, Debug, Default)]
struct ClientArgs {
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    api_secret: Option<String>,
    #[arg(long)]
    redirect_uri: Option<String>,
    #[arg(long)]
    consent_message: Option<String>,
    /// Grant type to enable; may repeat.
    #[arg(long = "grant", value_enum)]
    grants: Vec<Grant>,
    /// `VERB:/route`; may repeat.
    #[arg(long = "permission", value_parser = parse_permission)]
    permissions: Vec<Permission>,
    /// Comma separated user ids allowed to use the client.
    #[arg(long)]
    access_users: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Grant {
    Client,
    Authcode,
    Implicit,
    Resourceowner,
}

fn parse_permission(raw: &str) -> Result<Permission, String> {
    let (verb, route) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected VERB:/route, got `{raw}`"))?;
    let (verb, route) = (verb.trim(), route.trim());
    if verb.is_empty() || route.is_empty() {
        return Err(format!("expected VERB:/route, got `{raw}`"));
    }
    Ok(Permission::new(route, verb.to_ascii_uppercase()))
}

impl ClientArgs {
    fn apply(&self, client: &mut Client) {
        if let Some(key) = &self.api_key {
            client.api_key = key.clone();
        }
        if let Some(secret) = &self.api_secret {
            client.api_secret = secret.clone();
        }
        if let Some(uri) = &self.redirect_uri {
            client.oauth2_redirection_uri = uri.clone();
        }
        if let Some(message) = &self.consent_message {
            client.oauth2_consent_message = message.clone();
            client.oauth2_consent_message_active = true;
        }
        for grant in &self.grants {
            match grant {
                Grant::Client => client.oauth2_gt_client_active = true,
                Grant::Authcode => client.oauth2_gt_authcode_active = true,
                Grant::Implicit => client.oauth2_gt_implicit_active = true,
                Grant::Resourceowner => client.oauth2_gt_resourceowner_active = true,
            }
        }
        if let Some(users) = &self.access_users {
            client.access_user_csv = users.clone();
            client.oauth2_user_restriction_active = !users.trim().is_empty();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::GenKey => {
            println!("{}", TokenGenerator::from_entropy().api_key());
            return Ok(());
        }
        Command::GenSecret => {
            println!("{}", TokenGenerator::from_entropy().api_secret());
            return Ok(());
        }
        _ => {}
    }

    let mut settings = match &cli.config {
        Some(path) => load_settings_from(path, |key| std::env::var(key).ok()),
        None => load_settings(),
    };
    if let Some(endpoint) = &cli.rest_endpoint {
        settings.rest_endpoint = endpoint.clone();
    }
    settings.validate()?;

    let dialogs: Arc<dyn Dialogs> = if cli.yes {
        Arc::new(AutoConfirm(true))
    } else {
        Arc::new(TerminalDialogs)
    };
    let navigator = Arc::new(HistoryNavigator::new(LOGIN));
    let ctx = PanelContext::connect(settings, dialogs, navigator)?;

    if let Command::Status { retries } = cli.command {
        return status(ctx, retries).await;
    }

    sign_in(&ctx, &cli).await?;

    match &cli.command {
        Command::List => list(ctx).await,
        Command::Routes => routes(ctx).await,
        Command::Create { fields } => create(ctx, fields).await,
        Command::Edit {
            id,
            fields,
            random_key,
            random_secret,
            drop_permissions,
        } => {
            let mut editor = open_editor(ctx, ClientId(*id)).await?;
            fields.apply(&mut editor.current);
            if *random_key {
                editor.create_random_api_key();
            }
            if *random_secret {
                editor.create_random_api_secret();
            }
            let mut dropped = drop_permissions.clone();
            dropped.sort_unstable_by(|a, b| b.cmp(a));
            for index in dropped {
                if editor.delete_permission(index).is_none() {
                    bail!("client has no permission at position {index}");
                }
            }
            for permission in &fields.permissions {
                editor.add_permission(permission.clone());
            }
            save(editor).await
        }
        Command::Delete { id } => delete(ctx, ClientId(*id)).await,
        Command::GenKey | Command::GenSecret | Command::Status { .. } => Ok(()),
    }
}

async fn sign_in(ctx: &PanelContext, cli: &Cli) -> Result<()> {
    let mut login = LoginController::new(ctx.clone());
    if login.init().await && ctx.session.is_logged_in() {
        return Ok(());
    }

    let password = cli
        .password
        .clone()
        .or_else(|| std::env::var("PANEL_PASSWORD").ok());
    let (Some(user_name), Some(password)) = (cli.username.clone(), password) else {
        bail!("not logged in; pass --username and --password");
    };

    login.form = LoginForm {
        user_name,
        password,
    };
    if !login.manual_login().await {
        let reason = ctx
            .session
            .error()
            .map(|message| plain(&message))
            .unwrap_or_else(|| "login failed".to_string());
        bail!(reason);
    }
    Ok(())
}

async fn status(ctx: PanelContext, retries: u32) -> Result<()> {
    let mut offline = OfflineController::new(ctx);
    println!("REST endpoint: {}", offline.post_endpoint);
    println!("Installation:  {}", offline.install_dir);

    for attempt in 0..=retries {
        if attempt > 0 {
            tokio::time::sleep(Duration::from_secs(1)).await;
            offline.retry();
        }
        if offline.check_connection().await {
            println!("REST interface reachable");
            return Ok(());
        }
    }

    let diagnostics = offline.diagnostics.unwrap_or_default();
    bail!(plain(&diagnostics))
}

async fn load_list(ctx: PanelContext) -> Result<ClientListController> {
    let mut list = ClientListController::new(ctx);
    list.init().await;
    match list.warning.take() {
        Some(warning) => Err(anyhow!(plain(&warning))),
        None => Ok(list),
    }
}

async fn list(ctx: PanelContext) -> Result<()> {
    let list = load_list(ctx).await?;
    println!("{:>5}  {:<28}  {:<10}  {}", "ID", "API-KEY", "GRANTS", "PERMISSIONS");
    for client in &list.clients {
        println!(
            "{:>5}  {:<28}  {:<10}  {}",
            client.id.0,
            client.api_key,
            grant_flags(client),
            client.permissions().len()
        );
    }
    Ok(())
}

fn grant_flags(client: &Client) -> String {
    [
        (client.oauth2_gt_client_active, 'C'),
        (client.oauth2_gt_authcode_active, 'A'),
        (client.oauth2_gt_implicit_active, 'I'),
        (client.oauth2_gt_resourceowner_active, 'R'),
    ]
    .iter()
    .map(|(active, flag)| if *active { *flag } else { '-' })
    .collect()
}

async fn routes(ctx: PanelContext) -> Result<()> {
    let mut editor = ClientEditController::new(ctx);
    editor.load_routes().await;
    for (_, label) in editor.permission_options() {
        println!("{label}");
    }
    Ok(())
}

async fn create(ctx: PanelContext, fields: &ClientArgs) -> Result<()> {
    let mut list = ClientListController::new(ctx.clone());
    list.create_new_client();

    let mut editor = ClientEditController::new(ctx);
    editor.init().await;
    fields.apply(&mut editor.current);
    if fields.api_key.is_none() {
        editor.create_random_api_key();
    }
    if fields.api_secret.is_none() {
        editor.create_random_api_secret();
    }
    for permission in &fields.permissions {
        editor.add_permission(permission.clone());
    }
    println!("API-Key:    {}", editor.current.api_key);
    println!("API-Secret: {}", editor.current.api_secret);
    save(editor).await
}

async fn open_editor(ctx: PanelContext, id: ClientId) -> Result<ClientEditController> {
    let mut list = load_list(ctx.clone()).await?;
    let client = list
        .clients
        .iter()
        .find(|client| client.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("no client with id {id}"))?;
    list.edit_client(&client);

    let mut editor = ClientEditController::new(ctx);
    editor.init().await;
    Ok(editor)
}

async fn save(mut editor: ClientEditController) -> Result<()> {
    match editor.save_client().await {
        SaveOutcome::Created(id) => println!("created client {id}"),
        SaveOutcome::Updated => println!("client updated"),
        SaveOutcome::Cancelled => println!("nothing saved"),
        SaveOutcome::Failed(message) => bail!(plain(&message)),
    }
    Ok(())
}

async fn delete(ctx: PanelContext, id: ClientId) -> Result<()> {
    let mut list = load_list(ctx).await?;
    let index = list
        .clients
        .iter()
        .position(|client| client.id == id)
        .ok_or_else(|| anyhow!("no client with id {id}"))?;

    if list.delete_client(index).await.is_none() {
        println!("nothing deleted");
        return Ok(());
    }
    if let Some(warning) = list.warning.take() {
        bail!(plain(&warning));
    }
    info!(client_id = %id, "deleted");
    println!("client {id} deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_argument_splits_verb_and_route() {
        let permission = parse_permission("get:/v1/clients").expect("permission");
        assert_eq!(permission, Permission::new("/v1/clients", "GET"));
        assert!(parse_permission("/v1/clients").is_err());
        assert!(parse_permission("GET:").is_err());
    }

    #[test]
    fn client_args_enable_grants_and_restrictions() {
        let args = ClientArgs {
            grants: vec![Grant::Authcode, Grant::Resourceowner],
            access_users: Some("6,7".into()),
            consent_message: Some("Allow?".into()),
            ..ClientArgs::default()
        };
        let mut client = Client::draft();
        args.apply(&mut client);

        assert!(client.oauth2_gt_authcode_active);
        assert!(client.oauth2_gt_resourceowner_active);
        assert!(!client.oauth2_gt_client_active);
        assert!(client.oauth2_user_restriction_active);
        assert!(client.oauth2_consent_message_active);
        assert_eq!(grant_flags(&client), "-A-R");
    }

    #[test]
    fn cli_parses_edit_with_permissions() {
        let cli = Cli::try_parse_from([
            "panel",
            "--yes",
            "edit",
            "4",
            "--permission",
            "POST:/v1/clients",
            "--drop-permission",
            "0",
        ])
        .expect("parse");
        assert!(cli.yes);
        match cli.command {
            Command::Edit {
                id,
                fields,
                drop_permissions,
                ..
            } => {
                assert_eq!(id, 4);
                assert_eq!(fields.permissions, vec![Permission::new("/v1/clients", "POST")]);
                assert_eq!(drop_permissions, vec![0]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
