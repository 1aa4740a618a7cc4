//! `folio-admin`: manage portfolio content from the command line.
//!
//! Every command starts one backend operation through the admin store, waits
//! for it to settle, and prints the affected slice data as JSON. A rejected
//! operation prints its message and exits non-zero.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use folio_admin::inputs::{FeaturedSelection, JsonBody, LoginInput, SkillInput, SkillRef, UpdateInput};
use folio_admin::models::Record;
use folio_admin::slices::about::AboutAction;
use folio_admin::slices::auth::AuthAction;
use folio_admin::slices::contact::ContactAction;
use folio_admin::slices::education::EducationAction;
use folio_admin::slices::hero::HeroAction;
use folio_admin::slices::projects::ProjectsAction;
use folio_admin::slices::services::ServicesAction;
use folio_admin::slices::skills::SkillsAction;
use folio_admin::{
    AdminAction, AdminConfig, AdminEnvironment, AdminState, AdminStore, FileUpload, FormData, admin_store,
    dispatch,
};
use folio_core::{Collection, Lifecycle, RecordId};
use serde::Serialize;
use serde::de::IgnoredAny;
use serde_json::{Map, Value};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Extra time granted on top of the request timeout for the outcome to reach the store.
const SETTLE_MARGIN: Duration = Duration::from_secs(5);

/// Time given to in-flight effects on exit.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "folio-admin")]
#[command(about = "Manage Folio portfolio content")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides FOLIO_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the admin user
    Login {
        /// Admin email (defaults to FOLIO_ADMIN_EMAIL)
        #[arg(long)]
        email: Option<String>,

        /// Admin password (defaults to FOLIO_ADMIN_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Print the user of the current session
    Whoami,

    /// End the session
    Logout,

    /// First-time setup and credential changes
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },

    /// About section
    About {
        #[command(subcommand)]
        command: SingleCommand,
    },

    /// Hero banner
    Hero {
        #[command(subcommand)]
        command: SingleCommand,
    },

    /// Published contact details
    Contact {
        #[command(subcommand)]
        command: SingleCommand,
    },

    /// Visitor messages
    Messages {
        #[command(subcommand)]
        command: MessageCommand,
    },

    /// Education entries
    Education {
        #[command(subcommand)]
        command: CollectionCommand,
    },

    /// Portfolio projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Offered services
    Services {
        #[command(subcommand)]
        command: CollectionCommand,
    },

    /// Skill categories and skills
    Skills {
        #[command(subcommand)]
        command: SkillCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Create the first admin account
    Initialize(FieldArgs),
    /// Send a one-time password to the admin email
    GenerateOtp(FieldArgs),
    /// Change the admin email, confirming with a one-time password
    UpdateEmail(FieldArgs),
    /// Change the admin password, confirming with a one-time password
    UpdatePassword(FieldArgs),
}

#[derive(Subcommand, Debug)]
enum SingleCommand {
    /// Print the content
    Show,
    /// Create or replace the content
    Update(FormArgs),
}

#[derive(Subcommand, Debug)]
enum MessageCommand {
    /// List every message
    List,
    /// Print one message
    Show {
        /// Message id
        id: String,
    },
    /// Delete one message
    Delete {
        /// Message id
        id: String,
    },
    /// Post a message through the public contact form
    Send(FieldArgs),
}

#[derive(Subcommand, Debug)]
enum CollectionCommand {
    /// List every record
    List,
    /// Print one record
    Show {
        /// Record id
        id: String,
    },
    /// Create a record
    Create(FormArgs),
    /// Replace a record
    Update {
        /// Record id
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete a record
    Delete {
        /// Record id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    #[command(flatten)]
    Records(CollectionCommand),
    /// Print the featured selection
    Featured,
    /// Replace the featured selection
    Feature {
        /// Project ids in display order
        ids: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SkillCommand {
    /// List every category
    List,
    /// Print one category
    Show {
        /// Category id
        id: String,
    },
    /// Create a category
    Create(FieldArgs),
    /// Delete a category
    Delete {
        /// Category id
        id: String,
    },
    /// Add a skill to a category
    AddSkill {
        /// Category id
        category: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a skill
    UpdateSkill {
        /// Category id
        category: String,
        /// Skill id
        skill: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Remove a skill from its category
    RemoveSkill {
        /// Category id
        category: String,
        /// Skill id
        skill: String,
    },
}

/// Fields sent as a JSON object. Values that parse as JSON keep their type.
#[derive(Args, Debug, Default)]
struct FieldArgs {
    /// Field as `key=value` (repeatable)
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_pair)]
    fields: Vec<(String, String)>,
}

impl FieldArgs {
    fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, value)| {
                let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.clone()));
                (key.clone(), value)
            })
            .collect();
        Value::Object(object)
    }
}

/// Fields and files sent as `multipart/form-data`.
#[derive(Args, Debug, Default)]
struct FormArgs {
    /// Text field as `key=value` (repeatable)
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_pair)]
    fields: Vec<(String, String)>,

    /// File field as `key=path` (repeatable)
    #[arg(long = "file", value_name = "KEY=PATH", value_parser = parse_pair)]
    files: Vec<(String, String)>,
}

impl FormArgs {
    async fn into_form(self) -> Result<FormData> {
        let mut form = FormData::new();
        for (name, value) in self.fields {
            form.push_text(name, value);
        }
        for (name, path) in self.files {
            let upload = FileUpload::from_path(&path)
                .await
                .with_context(|| format!("Failed to read {path}"))?;
            form.push_file(name, upload);
        }
        Ok(form)
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

/// Action constructors and state view of a plain record collection.
struct Records {
    fetch_all: fn(Lifecycle<(), Option<Vec<Record>>>) -> AdminAction,
    fetch_by_id: fn(Lifecycle<RecordId, Option<Record>>) -> AdminAction,
    create: fn(Lifecycle<FormData, Option<Record>>) -> AdminAction,
    update: fn(Lifecycle<UpdateInput, Option<Record>>) -> AdminAction,
    delete: fn(Lifecycle<RecordId, IgnoredAny>) -> AdminAction,
    view: fn(&AdminState) -> &Collection<Record>,
}

const EDUCATION: Records = Records {
    fetch_all: |phase| AdminAction::Education(EducationAction::FetchAll(phase)),
    fetch_by_id: |phase| AdminAction::Education(EducationAction::FetchById(phase)),
    create: |phase| AdminAction::Education(EducationAction::Create(phase)),
    update: |phase| AdminAction::Education(EducationAction::Update(phase)),
    delete: |phase| AdminAction::Education(EducationAction::Delete(phase)),
    view: |state| &state.education.education,
};

const PROJECTS: Records = Records {
    fetch_all: |phase| AdminAction::Projects(ProjectsAction::FetchAll(phase)),
    fetch_by_id: |phase| AdminAction::Projects(ProjectsAction::FetchById(phase)),
    create: |phase| AdminAction::Projects(ProjectsAction::Create(phase)),
    update: |phase| AdminAction::Projects(ProjectsAction::Update(phase)),
    delete: |phase| AdminAction::Projects(ProjectsAction::Delete(phase)),
    view: |state| &state.projects.projects,
};

const SERVICES: Records = Records {
    fetch_all: |phase| AdminAction::Services(ServicesAction::FetchAll(phase)),
    fetch_by_id: |phase| AdminAction::Services(ServicesAction::FetchById(phase)),
    create: |phase| AdminAction::Services(ServicesAction::Create(phase)),
    update: |phase| AdminAction::Services(ServicesAction::Update(phase)),
    delete: |phase| AdminAction::Services(ServicesAction::Delete(phase)),
    view: |state| &state.services.services,
};

/// A store plus how long to wait for each operation.
struct Session {
    store: AdminStore,
    wait: Duration,
}

impl Session {
    async fn run(&self, action: AdminAction) -> Result<()> {
        dispatch(&self.store, action, self.wait).await?;
        Ok(())
    }

    async fn print<F>(&self, render: F) -> Result<()>
    where
        F: FnOnce(&AdminState) -> serde_json::Result<String>,
    {
        let json = self.store.state(render).await?;
        println!("{json}");
        Ok(())
    }

    async fn records(&self, records: &Records, command: CollectionCommand) -> Result<()> {
        match command {
            CollectionCommand::List => {
                self.run((records.fetch_all)(Lifecycle::start(()))).await?;
                self.print(|s| json((records.view)(s).items())).await
            },
            CollectionCommand::Show { id } => {
                self.run((records.fetch_by_id)(Lifecycle::start(RecordId::from(id)))).await?;
                self.print(|s| json(&(records.view)(s).current())).await
            },
            CollectionCommand::Create(form) => {
                let form = form.into_form().await?;
                self.run((records.create)(Lifecycle::start(form))).await?;
                self.print(|s| json((records.view)(s).items())).await
            },
            CollectionCommand::Update { id, form } => {
                let input = UpdateInput {
                    id: RecordId::from(id),
                    form: form.into_form().await?,
                };
                self.run((records.update)(Lifecycle::start(input))).await?;
                self.print(|s| json((records.view)(s).items())).await
            },
            CollectionCommand::Delete { id } => {
                self.run((records.delete)(Lifecycle::start(RecordId::from(id)))).await?;
                self.print(|s| json((records.view)(s).items())).await
            },
        }
    }

    async fn login(&self, input: LoginInput) -> Result<()> {
        tracing::info!(email = %input.email, "Logging in");
        self.run(AdminAction::Auth(AuthAction::Login(Lifecycle::start(input)))).await
    }

    async fn account(&self, command: AccountCommand) -> Result<()> {
        let action = match command {
            AccountCommand::Initialize(fields) => {
                AuthAction::InitializeAdmin(Lifecycle::start(JsonBody(fields.to_json())))
            },
            AccountCommand::GenerateOtp(fields) => {
                AuthAction::GenerateOtp(Lifecycle::start(JsonBody(fields.to_json())))
            },
            AccountCommand::UpdateEmail(fields) => {
                AuthAction::VerifyOtpAndUpdateEmail(Lifecycle::start(JsonBody(fields.to_json())))
            },
            AccountCommand::UpdatePassword(fields) => {
                AuthAction::VerifyOtpAndUpdatePassword(Lifecycle::start(JsonBody(fields.to_json())))
            },
        };
        self.run(AdminAction::Auth(action)).await?;
        self.print(|s| json(&s.auth.status)).await
    }

    async fn about(&self, command: SingleCommand) -> Result<()> {
        let action = match command {
            SingleCommand::Show => AboutAction::Fetch(Lifecycle::start(())),
            SingleCommand::Update(form) => AboutAction::AddUpdate(Lifecycle::start(form.into_form().await?)),
        };
        self.run(AdminAction::About(action)).await?;
        self.print(|s| json(&s.about.about_data)).await
    }

    async fn hero(&self, command: SingleCommand) -> Result<()> {
        let action = match command {
            SingleCommand::Show => HeroAction::Fetch(Lifecycle::start(())),
            SingleCommand::Update(form) => HeroAction::Update(Lifecycle::start(form.into_form().await?)),
        };
        self.run(AdminAction::Hero(action)).await?;
        self.print(|s| json(&s.hero.hero_data)).await
    }

    async fn contact(&self, command: SingleCommand) -> Result<()> {
        let action = match command {
            SingleCommand::Show => ContactAction::GetContactDetails(Lifecycle::start(())),
            SingleCommand::Update(form) => {
                ContactAction::AddUpdateContactDetails(Lifecycle::start(form.into_form().await?))
            },
        };
        self.run(AdminAction::Contact(action)).await?;
        self.print(|s| json(s.contact.contact.items())).await
    }

    async fn messages(&self, command: MessageCommand) -> Result<()> {
        match command {
            MessageCommand::List => {
                self.run(AdminAction::Contact(ContactAction::GetAllMessages(Lifecycle::start(()))))
                    .await?;
                self.print(|s| json(s.contact.messages.items())).await
            },
            MessageCommand::Show { id } => {
                let input = RecordId::from(id);
                self.run(AdminAction::Contact(ContactAction::GetMessageById(Lifecycle::start(input))))
                    .await?;
                self.print(|s| json(&s.contact.messages.current())).await
            },
            MessageCommand::Delete { id } => {
                let input = RecordId::from(id);
                self.run(AdminAction::Contact(ContactAction::DeleteMessage(Lifecycle::start(input))))
                    .await?;
                self.print(|s| json(s.contact.messages.items())).await
            },
            MessageCommand::Send(fields) => {
                let input = JsonBody(fields.to_json());
                self.run(AdminAction::Contact(ContactAction::SendContactMessage(Lifecycle::start(input))))
                    .await?;
                self.print(|s| json(&s.contact.status)).await
            },
        }
    }

    async fn projects(&self, command: ProjectCommand) -> Result<()> {
        match command {
            ProjectCommand::Records(command) => self.records(&PROJECTS, command).await,
            ProjectCommand::Featured => {
                self.run(AdminAction::Projects(ProjectsAction::FetchFeatured(Lifecycle::start(()))))
                    .await?;
                self.print(|s| json(&s.projects.featured_projects)).await
            },
            ProjectCommand::Feature { ids } => {
                let selection = FeaturedSelection {
                    project_ids: ids.into_iter().map(RecordId::from).collect(),
                };
                self.run(AdminAction::Projects(ProjectsAction::SetFeatured(Lifecycle::start(selection))))
                    .await?;
                self.print(|s| json(&s.projects.featured_projects)).await
            },
        }
    }

    async fn skills(&self, command: SkillCommand) -> Result<()> {
        let action = match command {
            SkillCommand::List => SkillsAction::FetchAll(Lifecycle::start(())),
            SkillCommand::Show { id } => {
                self.run(AdminAction::Skills(SkillsAction::FetchById(Lifecycle::start(RecordId::from(id)))))
                    .await?;
                return self.print(|s| json(&s.skills.categories.current())).await;
            },
            SkillCommand::Create(fields) => {
                SkillsAction::CreateCategory(Lifecycle::start(JsonBody(fields.to_json())))
            },
            SkillCommand::Delete { id } => SkillsAction::DeleteCategory(Lifecycle::start(RecordId::from(id))),
            SkillCommand::AddSkill { category, fields } => SkillsAction::AddSkill(Lifecycle::start(SkillInput {
                id: RecordId::from(category),
                skill: fields.to_json(),
            })),
            SkillCommand::UpdateSkill {
                category,
                skill,
                fields,
            } => SkillsAction::UpdateSkill(Lifecycle::start(SkillRef {
                category_id: RecordId::from(category),
                skill_id: RecordId::from(skill),
                skill: Some(fields.to_json()),
            })),
            SkillCommand::RemoveSkill { category, skill } => SkillsAction::DeleteSkill(Lifecycle::start(SkillRef {
                category_id: RecordId::from(category),
                skill_id: RecordId::from(skill),
                skill: None,
            })),
        };
        self.run(AdminAction::Skills(action)).await?;
        self.print(|s| json(s.skills.categories.items())).await
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

fn load_config(cli: &Cli) -> Result<AdminConfig> {
    let mut config = AdminConfig::from_env().context("Invalid configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = AdminConfig::new(base_url)?.base_url;
    }
    Ok(config)
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing(fallback: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: Cli, config: AdminConfig) -> Result<()> {
    let environment = AdminEnvironment::from_config(&config)?;
    let session = Session {
        store: admin_store(environment),
        wait: config.write_timeout.max(config.read_timeout) + SETTLE_MARGIN,
    };

    if let Command::Login { email, password } = cli.command {
        let configured = config.credentials.clone();
        let input = LoginInput {
            email: email
                .or_else(|| configured.as_ref().map(|c| c.email.clone()))
                .context("No email given and FOLIO_ADMIN_EMAIL is unset")?,
            password: password
                .or_else(|| configured.map(|c| c.password))
                .context("No password given and FOLIO_ADMIN_PASSWORD is unset")?,
        };
        session.login(input).await?;
        session.print(|s| json(&s.auth.user)).await?;
        return shutdown(&session).await;
    }

    if let Some(credentials) = &config.credentials {
        session
            .login(LoginInput {
                email: credentials.email.clone(),
                password: credentials.password.clone(),
            })
            .await?;
    }

    match cli.command {
        Command::Login { .. } => {},
        Command::Whoami => {
            session
                .run(AdminAction::Auth(AuthAction::CheckAuth(Lifecycle::start(()))))
                .await?;
            session.print(|s| json(&s.auth.user)).await?;
        },
        Command::Logout => {
            session.run(AdminAction::Auth(AuthAction::Logout(Lifecycle::start(())))).await?;
            session.print(|s| json(&s.auth.is_authenticated)).await?;
        },
        Command::Account { command } => session.account(command).await?,
        Command::About { command } => session.about(command).await?,
        Command::Hero { command } => session.hero(command).await?,
        Command::Contact { command } => session.contact(command).await?,
        Command::Messages { command } => session.messages(command).await?,
        Command::Education { command } => session.records(&EDUCATION, command).await?,
        Command::Projects { command } => session.projects(command).await?,
        Command::Services { command } => session.records(&SERVICES, command).await?,
        Command::Skills { command } => session.skills(command).await?,
    }

    shutdown(&session).await
}

async fn shutdown(session: &Session) -> Result<()> {
    session.store.shutdown(SHUTDOWN_TIMEOUT).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            return ExitCode::FAILURE;
        },
    };

    init_tracing(&config.log_level);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(?error, "Command failed");
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pairs_split_on_first_equals() {
        assert_eq!(parse_pair("url=a=b").unwrap(), ("url".to_string(), "a=b".to_string()));
        assert!(parse_pair("no-separator").is_err());
        assert!(parse_pair("=value").is_err());
    }

    #[test]
    fn json_fields_keep_their_type() {
        let fields = FieldArgs {
            fields: vec![
                ("name".to_string(), "Rust".to_string()),
                ("level".to_string(), "90".to_string()),
                ("tags".to_string(), "[\"systems\"]".to_string()),
            ],
        };

        assert_eq!(fields.to_json(), json!({"name": "Rust", "level": 90, "tags": ["systems"]}));
    }

    #[test]
    fn update_command_parses_fields_and_files() {
        let cli = Cli::parse_from([
            "folio-admin",
            "projects",
            "update",
            "p1",
            "--field",
            "title=Folio",
            "--file",
            "image=./shot.png",
        ]);

        let Command::Projects {
            command: ProjectCommand::Records(CollectionCommand::Update { id, form }),
        } = cli.command
        else {
            panic!("expected `projects update`");
        };
        assert_eq!(id, "p1");
        assert_eq!(form.fields, vec![("title".to_string(), "Folio".to_string())]);
        assert_eq!(form.files, vec![("image".to_string(), "./shot.png".to_string())]);
    }

    #[tokio::test]
    async fn form_args_without_files_build_text_form() {
        let form = FormArgs {
            fields: vec![("title".to_string(), "Folio".to_string())],
            files: Vec::new(),
        }
        .into_form()
        .await
        .unwrap();

        assert_eq!(form.text_value("title"), Some("Folio"));
    }

    #[tokio::test]
    async fn missing_upload_is_reported() {
        let error = FormArgs {
            fields: Vec::new(),
            files: vec![("image".to_string(), "/definitely/not/here.png".to_string())],
        }
        .into_form()
        .await
        .unwrap_err();

        assert!(error.to_string().contains("/definitely/not/here.png"));
    }
}
