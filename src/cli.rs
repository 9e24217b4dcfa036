//! Command line surface of the Shortly client

use clap::{Args, Parser, Subcommand};
use dialoguer::{Confirm, Input, Password};
use std::path::PathBuf;
use std::sync::Arc;

use shortly_protocol::{CreateLinkRequest, RegisterRequest, UpdateLinkRequest};

use crate::analytics::AnalyticsService;
use crate::auth::AuthService;
use crate::client::ApiClient;
use crate::config::CliConfig;
use crate::domains::DomainService;
use crate::error::{Result, ShortlyError};
use crate::folders::FolderService;
use crate::links::{LinkService, ListLinksQuery};
use crate::store::{CredentialStore, FileStore, MemoryStore};
use crate::ui::UI;
use crate::users::UserService;
use crate::version::CURRENT_VERSION;

#[derive(Parser)]
#[command(
    name = "shortly",
    about = "Shortly URL shortener from the command line",
    long_about = "Shortly - shorten, organize and track links from the terminal

OVERVIEW:
  This tool talks to your Shortly workspace: create short links, group them
  into folders, attach custom domains and read click analytics.

WORKFLOW:
  1. Login with your account email
  2. Shorten URLs and organize them
  3. Watch the numbers come in

QUICK START:
  shortly login                         # Sign in with email and password
  shortly shorten https://example.com   # Create a short link
  shortly links list                    # List your links
  shortly stats --days 30               # Click analytics for the last month
  shortly status                        # Check session and server status",
    version = CURRENT_VERSION,
    author = "Shortly Team",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with your account email
    Login(LoginArgs),

    /// Sign out and drop the stored session
    Logout,

    /// Create an account
    Register,

    /// Confirm an email address with the token from the verification mail
    VerifyEmail(VerifyEmailArgs),

    /// Request a password reset email
    ForgotPassword(ForgotPasswordArgs),

    /// Set a new password with the token from the reset email
    ResetPassword(ResetPasswordArgs),

    /// Show session status
    #[command(aliases = &["st"])]
    Status,

    /// Shorten a URL
    Shorten(ShortenArgs),

    /// Manage short links
    Links(LinksArgs),

    /// Manage folders
    Folders(FoldersArgs),

    /// Manage custom domains
    Domains(DomainsArgs),

    /// List accounts (admin only)
    Users(UsersArgs),

    /// Show click analytics
    Stats(StatsArgs),

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    /// Account email; prompted for when omitted
    pub email: Option<String>,
}

#[derive(Args)]
pub struct VerifyEmailArgs {
    #[arg(long)]
    pub token: String,
}

#[derive(Args)]
pub struct ForgotPasswordArgs {
    pub email: String,
}

#[derive(Args)]
pub struct ResetPasswordArgs {
    #[arg(long)]
    pub token: String,
}

#[derive(Args)]
pub struct ShortenArgs {
    /// Destination URL
    pub url: String,

    #[arg(short, long)]
    pub title: Option<String>,

    /// Custom short code instead of a generated one
    #[arg(short, long)]
    pub alias: Option<String>,

    /// Folder id to file the link under
    #[arg(short, long)]
    pub folder: Option<String>,

    /// Require a password before redirecting
    #[arg(long)]
    pub password: Option<String>,

    /// Disable the link after this many clicks
    #[arg(long)]
    pub max_clicks: Option<u64>,
}

#[derive(Args)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

#[derive(Subcommand)]
pub enum LinksCommand {
    /// List links
    #[command(aliases = &["ls"])]
    List {
        /// Only links in this folder
        #[arg(short, long)]
        folder: Option<String>,

        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Delete a link
    #[command(aliases = &["rm"])]
    Delete {
        id: String,

        #[arg(short, long)]
        force: bool,
    },

    /// Enable or disable a link
    Toggle {
        id: String,

        /// Desired state: "on" or "off"
        state: String,
    },

    /// Unlock a password-protected short code and print its destination
    Verify { code: String },
}

#[derive(Args)]
pub struct FoldersArgs {
    #[command(subcommand)]
    pub command: FoldersCommand,
}

#[derive(Subcommand)]
pub enum FoldersCommand {
    /// List folders
    #[command(aliases = &["ls"])]
    List,

    /// Create a folder
    Create {
        name: String,

        /// Hex color shown in the dashboard
        #[arg(short, long, default_value = "#6366f1")]
        color: String,
    },

    /// Delete a folder
    #[command(aliases = &["rm"])]
    Delete {
        id: String,

        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct DomainsArgs {
    #[command(subcommand)]
    pub command: DomainsCommand,
}

#[derive(Subcommand)]
pub enum DomainsCommand {
    /// List custom domains
    #[command(aliases = &["ls"])]
    List,

    /// Attach a custom domain
    Add { domain: String },

    /// Detach a custom domain
    #[command(aliases = &["rm"])]
    Remove {
        id: String,

        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List all accounts
    #[command(aliases = &["ls"])]
    List,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Trailing window in days
    #[arg(short, long, default_value_t = 30)]
    pub days: u32,

    /// How many top links to show
    #[arg(short, long, default_value_t = 5)]
    pub limit: u32,

    /// Public stats for one short code instead of the account overview
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetEndpoint { url: String },
    SetTimeout { seconds: u64 },
    SetVerbose { enabled: String },
    Reset,
}

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: Option<PathBuf>,
    ui: UI,
}

impl CliHandler {
    /// Create a new CLI handler, optionally with a custom config path
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            ui: UI::new(),
        }
    }

    /// Load configuration using the handler's config path
    async fn load_config(&self) -> Result<CliConfig> {
        CliConfig::load(self.config_path.as_deref()).await
    }

    /// Build the API client backed by the configured credential store
    async fn build_client(&self) -> Result<Arc<ApiClient>> {
        let config = self.load_config().await?;
        let client_config = config.to_client_config()?;

        let store: Arc<dyn CredentialStore> =
            match client_config.credential_storage.storage_path.as_deref() {
                Some(path) if client_config.credential_storage.enabled => {
                    Arc::new(FileStore::open(path)?)
                }
                _ => Arc::new(MemoryStore::new()),
            };

        Ok(Arc::new(ApiClient::new(client_config, store)?))
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login(args) => self.handle_login(args).await,
            Commands::Logout => self.handle_logout().await,
            Commands::Register => self.handle_register().await,
            Commands::VerifyEmail(args) => self.handle_verify_email(args.token).await,
            Commands::ForgotPassword(args) => self.handle_forgot_password(args.email).await,
            Commands::ResetPassword(args) => self.handle_reset_password(args.token).await,
            Commands::Status => self.handle_status().await,
            Commands::Shorten(args) => self.handle_shorten(args).await,
            Commands::Links(args) => self.handle_links(args.command).await,
            Commands::Folders(args) => self.handle_folders(args.command).await,
            Commands::Domains(args) => self.handle_domains(args.command).await,
            Commands::Users(args) => self.handle_users(args.command).await,
            Commands::Stats(args) => self.handle_stats(args).await,
            Commands::Config(args) => self.handle_config(args.command).await,
        }
    }

    // ==================== Session commands ====================

    async fn handle_login(&mut self, args: LoginArgs) -> Result<()> {
        let email = match args.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };
        let password = Password::new().with_prompt("Password").interact()?;

        let client = self.build_client().await?;
        let service = AuthService::new(client);
        let response = service.login(email, password).await?;

        self.ui
            .success(&format!("Welcome back, {}!", response.user.first_name));
        Ok(())
    }

    async fn handle_logout(&mut self) -> Result<()> {
        let client = self.build_client().await?;
        let service = AuthService::new(client);
        service.logout().await?;
        self.ui.info("Logged out successfully");
        Ok(())
    }

    async fn handle_register(&mut self) -> Result<()> {
        let first_name: String = Input::new().with_prompt("First name").interact_text()?;
        let last_name: String = Input::new().with_prompt("Last name").interact_text()?;
        let email: String = Input::new().with_prompt("Email").interact_text()?;
        let password = Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?;

        let client = self.build_client().await?;
        let service = AuthService::new(client);
        service
            .register(RegisterRequest {
                email,
                password,
                first_name,
                last_name,
            })
            .await?;

        self.ui
            .success("Account created successfully. Please check your email.");
        Ok(())
    }

    async fn handle_verify_email(&mut self, token: String) -> Result<()> {
        let client = self.build_client().await?;
        AuthService::new(client).verify_email(token).await?;
        self.ui.success("Email verified successfully");
        Ok(())
    }

    async fn handle_forgot_password(&mut self, email: String) -> Result<()> {
        let client = self.build_client().await?;
        AuthService::new(client).forgot_password(email).await?;
        self.ui
            .info("If that address exists, a reset email is on its way");
        Ok(())
    }

    async fn handle_reset_password(&mut self, token: String) -> Result<()> {
        let password = Password::new()
            .with_prompt("New password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?;

        let client = self.build_client().await?;
        AuthService::new(client)
            .reset_password(token, password)
            .await?;
        self.ui.success("Password reset successfully");
        Ok(())
    }

    async fn handle_status(&mut self) -> Result<()> {
        let config = self.load_config().await?;
        let client = self.build_client().await?;
        let service = AuthService::new(client);
        let status = service.status().await;

        let mut status_info = vec![
            ("Version", format!("shortly v{}", CURRENT_VERSION)),
            ("Endpoint", config.endpoint.clone()),
            ("Session", self.ui.format_auth_status(status.authenticated)),
        ];

        if let Some(user) = &status.user {
            status_info.push(("Name", user.full_name()));
            status_info.push(("Email", user.email.clone()));
            status_info.push(("Role", user.system_role.clone()));
        }
        if let Some(message) = status.server_message {
            status_info.push(("Server", message));
        }

        self.ui.card("Status", status_info);
        Ok(())
    }

    // ==================== Link commands ====================

    async fn handle_shorten(&mut self, args: ShortenArgs) -> Result<()> {
        let client = self.build_client().await?;
        let request = CreateLinkRequest {
            original_url: args.url,
            title: args.title,
            custom_alias: args.alias,
            password: args.password,
            folder_id: args.folder,
            max_clicks: args.max_clicks,
            ..CreateLinkRequest::default()
        };

        let link = LinkService::new().create(&client, &request).await?;
        self.ui
            .success(&format!("{} -> {}", link.short_url, link.original_url));
        Ok(())
    }

    async fn handle_links(&mut self, command: LinksCommand) -> Result<()> {
        let client = self.build_client().await?;
        let service = LinkService::new();

        match command {
            LinksCommand::List {
                folder,
                limit,
                page,
            } => {
                let query = ListLinksQuery {
                    folder_id: folder,
                    page: Some(page),
                    limit: Some(limit),
                };
                let listing = service.list(&client, &query).await?;

                let rows = listing
                    .items
                    .iter()
                    .map(|link| {
                        vec![
                            link.short_code.clone(),
                            link.display_label().to_string(),
                            link.total_clicks.to_string(),
                            self.ui.format_active(link.is_active),
                            link.original_url.clone(),
                        ]
                    })
                    .collect();
                self.ui
                    .table(&["CODE", "TITLE", "CLICKS", "STATE", "URL"], rows);
                self.ui.info(&format!(
                    "Page {} of {} ({} links)",
                    listing.meta.page, listing.meta.total_pages, listing.meta.total
                ));
            }
            LinksCommand::Delete { id, force } => {
                if !force && !self.confirm(&format!("Delete link {}?", id))? {
                    return Ok(());
                }
                service.delete(&client, &id).await?;
                self.ui.success("Link deleted");
            }
            LinksCommand::Toggle { id, state } => {
                let is_active = match state.as_str() {
                    "on" => true,
                    "off" => false,
                    other => {
                        return Err(ShortlyError::invalid_input(format!(
                            "Expected 'on' or 'off', got '{}'",
                            other
                        )))
                    }
                };
                let request = UpdateLinkRequest {
                    is_active: Some(is_active),
                    ..UpdateLinkRequest::default()
                };
                let link = service.update(&client, &id, &request).await?;
                self.ui.success(&format!(
                    "{} is now {}",
                    link.short_code,
                    self.ui.format_active(link.is_active)
                ));
            }
            LinksCommand::Verify { code } => {
                let password = Password::new().with_prompt("Link password").interact()?;
                let verified = service.verify_password(&client, &code, password).await?;
                self.ui.success(&verified.original_url);
            }
        }
        Ok(())
    }

    // ==================== Folder commands ====================

    async fn handle_folders(&mut self, command: FoldersCommand) -> Result<()> {
        let client = self.build_client().await?;
        let service = FolderService::new();

        match command {
            FoldersCommand::List => {
                let folders = service.list(&client).await?;
                let rows = folders
                    .iter()
                    .map(|folder| {
                        vec![
                            folder.id.clone(),
                            folder.name.clone(),
                            folder.color.clone(),
                            folder.link_count().to_string(),
                        ]
                    })
                    .collect();
                self.ui.table(&["ID", "NAME", "COLOR", "LINKS"], rows);
            }
            FoldersCommand::Create { name, color } => {
                let folder = service.create(&client, name, color).await?;
                self.ui
                    .success(&format!("Folder '{}' created", folder.name));
            }
            FoldersCommand::Delete { id, force } => {
                if !force && !self.confirm(&format!("Delete folder {}?", id))? {
                    return Ok(());
                }
                service.delete(&client, &id).await?;
                self.ui.success("Folder deleted");
            }
        }
        Ok(())
    }

    // ==================== Domain commands ====================

    async fn handle_domains(&mut self, command: DomainsCommand) -> Result<()> {
        let client = self.build_client().await?;
        let service = DomainService::new();

        match command {
            DomainsCommand::List => {
                let domains = service.list(&client).await?;
                let rows = domains
                    .iter()
                    .map(|domain| {
                        vec![
                            domain.id.clone(),
                            domain.domain.clone(),
                            format!("{:?}", domain.status),
                            if domain.is_verified { "yes" } else { "no" }.to_string(),
                        ]
                    })
                    .collect();
                self.ui.table(&["ID", "DOMAIN", "STATUS", "VERIFIED"], rows);
            }
            DomainsCommand::Add { domain } => {
                let added = service.add(&client, domain).await?;
                self.ui.success(&format!(
                    "{} attached, verification {:?}",
                    added.domain, added.status
                ));
            }
            DomainsCommand::Remove { id, force } => {
                if !force && !self.confirm(&format!("Detach domain {}?", id))? {
                    return Ok(());
                }
                service.delete(&client, &id).await?;
                self.ui.success("Domain detached");
            }
        }
        Ok(())
    }

    // ==================== User commands ====================

    async fn handle_users(&mut self, command: UsersCommand) -> Result<()> {
        let client = self.build_client().await?;

        match command {
            UsersCommand::List => {
                let accounts = UserService::new().list(&client).await?;
                let rows = accounts
                    .iter()
                    .map(|account| {
                        vec![
                            account.email.clone(),
                            format!("{} {}", account.first_name, account.last_name),
                            account.system_role.clone(),
                            if account.is_email_verified { "yes" } else { "no" }.to_string(),
                            account.created_at.format("%Y-%m-%d").to_string(),
                        ]
                    })
                    .collect();
                self.ui
                    .table(&["EMAIL", "NAME", "ROLE", "VERIFIED", "JOINED"], rows);
            }
        }
        Ok(())
    }

    // ==================== Analytics commands ====================

    async fn handle_stats(&mut self, args: StatsArgs) -> Result<()> {
        let client = self.build_client().await?;
        let service = AnalyticsService::new();

        if let Some(code) = args.code {
            let stats = service.public_stats(&client, &code).await?;
            self.ui.card(
                &format!("Stats for {}", code),
                vec![
                    ("Total clicks", stats.all_time.total_clicks.to_string()),
                    ("Unique clicks", stats.all_time.unique_clicks.to_string()),
                    (
                        "Last click",
                        self.ui
                            .format_user_field(stats.last_click_at.map(|t| t.to_rfc3339())),
                    ),
                    ("Created", stats.created_at.to_rfc3339()),
                ],
            );
            return Ok(());
        }

        let summary = service.dashboard(&client, args.days).await?;
        self.ui.card(
            &format!("Last {} days", args.days),
            vec![
                ("Total clicks", summary.total_clicks.to_string()),
                ("Total links", summary.total_links.to_string()),
                ("Clicks in period", summary.clicks_in_period.to_string()),
                (
                    "Top link",
                    self.ui.format_user_field(
                        summary
                            .top_link
                            .as_ref()
                            .map(|top| top.title.clone().unwrap_or_else(|| top.short_code.clone())),
                    ),
                ),
            ],
        );

        let top = service.top_links(&client, args.limit).await?;
        if !top.is_empty() {
            let rows = top
                .iter()
                .map(|link| {
                    vec![
                        link.short_code.clone(),
                        link.title.clone().unwrap_or_else(|| "-".to_string()),
                        link.clicks.to_string(),
                        link.original_url.clone(),
                    ]
                })
                .collect();
            self.ui.table(&["CODE", "TITLE", "CLICKS", "URL"], rows);
        }
        Ok(())
    }

    // ==================== Config commands ====================

    async fn handle_config(&mut self, command: ConfigCommand) -> Result<()> {
        let config_path = self
            .config_path
            .clone()
            .unwrap_or_else(crate::config::default_config_path);
        let mut config = self.load_config().await?;

        match command {
            ConfigCommand::Show => {
                self.ui.card(
                    "Configuration",
                    vec![
                        ("Endpoint", config.endpoint.clone()),
                        ("Timeout", format!("{}s", config.timeout)),
                        ("Verbose", config.verbose.to_string()),
                        (
                            "Storage dir",
                            config.storage_dir.to_string_lossy().to_string(),
                        ),
                        (
                            "Credential storage",
                            config.credential_storage_enabled.to_string(),
                        ),
                    ],
                );
            }
            ConfigCommand::SetEndpoint { url } => {
                if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ShortlyError::invalid_endpoint(url));
                }
                config.endpoint = url;
                config.save(&config_path).await?;
                self.ui.success("Endpoint updated");
            }
            ConfigCommand::SetTimeout { seconds } => {
                if seconds == 0 {
                    return Err(ShortlyError::invalid_input("Timeout cannot be zero"));
                }
                config.timeout = seconds;
                config.save(&config_path).await?;
                self.ui.success("Timeout updated");
            }
            ConfigCommand::SetVerbose { enabled } => {
                config.verbose = match enabled.as_str() {
                    "true" | "on" => true,
                    "false" | "off" => false,
                    other => {
                        return Err(ShortlyError::invalid_input(format!(
                            "Expected 'on' or 'off', got '{}'",
                            other
                        )))
                    }
                };
                config.save(&config_path).await?;
                self.ui.success("Verbose updated");
            }
            ConfigCommand::Reset => {
                let config = CliConfig::default();
                config.save(&config_path).await?;
                self.ui.success("Configuration reset to defaults");
            }
        }
        Ok(())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}
