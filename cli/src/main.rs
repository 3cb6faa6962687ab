use std::path::{Path, PathBuf};

use circle_admin::AdminStore;
use circle_admin::config::{AdminConfig, ConfigError, normalize_base_url};
use circle_admin::net::ClientError;
use circle_admin::pages::content::{CatalogPage, SliderPage, TopicsPage, slide_form, topic_form};
use circle_admin::pages::dashboard::DashboardPage;
use circle_admin::pages::ledger::LedgerPage;
use circle_admin::pages::login::LoginPage;
use circle_admin::pages::question_groups::{AnswerForm, QuestionForm, QuestionGroupsPage, group_form};
use circle_admin::pages::settings::SettingsPage;
use circle_admin::pages::users::{UserMode, UsersPage, with_country};
use circle_admin::state::ledger::LedgerKind;
use circle_admin::state::preferences::{Language, Theme};
use circle_admin::state::settings::SettingsUpdate;
use circle_admin::state::slice::{DateRange, ListQuery};
use circle_admin::util::auth::{GateDecision, Route};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};
use wire::{Attachment, Credentials, FormPayload, Record, RecordId};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{}", .0.reason())]
    Client(#[from] ClientError),
    #[error("not signed in; run `circle-admin login` first (redirected to {0})")]
    NotAuthenticated(&'static str),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: String, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid answer `{0}`; expected `english|arabic`")]
    InvalidAnswer(String),
}

#[derive(Parser, Debug)]
#[command(name = "circle-admin", about = "Admin console for the coaching platform API")]
struct Cli {
    #[arg(long, env = "ADMIN_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "ADMIN_API_ROLE_PREFIX")]
    role_prefix: Option<String>,

    #[arg(long, env = "ADMIN_STATE_PATH")]
    state_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    Whoami,
    Users(UsersCommand),
    Slides(SlidesCommand),
    Topics(TopicsCommand),
    Groups(GroupsCommand),
    Questions(QuestionsCommand),
    Countries,
    Settings(SettingsCommand),
    Ledger(LedgerArgs),
    Stats(DateArgs),
    Prefs(PrefsCommand),
}

#[derive(Args, Debug)]
struct DateArgs {
    #[arg(long)]
    from: Option<String>,
    #[arg(long)]
    to: Option<String>,
}

impl DateArgs {
    fn range(self) -> DateRange {
        DateRange::new(self.from, self.to)
    }
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UserScope {
    All,
    Coaches,
    Trainees,
}

impl UserScope {
    fn mode(self) -> UserMode {
        match self {
            Self::All => UserMode::All,
            Self::Coaches => UserMode::Coaches,
            Self::Trainees => UserMode::Trainees,
        }
    }

    fn route(self) -> Route {
        match self {
            Self::All => Route::Users,
            Self::Coaches => Route::Coaches,
            Self::Trainees => Route::Trainees,
        }
    }
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[arg(long, value_enum, default_value = "all")]
    scope: UserScope,
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        search: Option<String>,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: RecordId,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: RecordId,
    },
    Restore {
        id: RecordId,
    },
}

// =============================================================================
// CONTENT
// =============================================================================

#[derive(Args, Debug)]
struct SlidesCommand {
    #[command(subcommand)]
    command: SlidesSubcommand,
}

#[derive(Subcommand, Debug)]
enum SlidesSubcommand {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        image: PathBuf,
    },
    Delete {
        id: RecordId,
    },
}

#[derive(Args, Debug)]
struct TopicsCommand {
    #[command(subcommand)]
    command: TopicsSubcommand,
}

#[derive(Subcommand, Debug)]
enum TopicsSubcommand {
    List,
    Create {
        #[arg(long)]
        name_en: String,
        #[arg(long)]
        name_ar: String,
        #[arg(long)]
        slug: String,
    },
    Delete {
        id: RecordId,
    },
}

#[derive(Args, Debug)]
struct GroupsCommand {
    #[command(subcommand)]
    command: GroupsSubcommand,
}

#[derive(Subcommand, Debug)]
enum GroupsSubcommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Create {
        #[arg(long)]
        title_en: String,
        #[arg(long)]
        title_ar: String,
    },
    Delete {
        id: RecordId,
    },
}

#[derive(Args, Debug)]
struct QuestionsCommand {
    #[command(subcommand)]
    command: QuestionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum QuestionsSubcommand {
    List {
        group: RecordId,
    },
    Create {
        group: RecordId,
        #[arg(long = "type", default_value = "multiple_choice")]
        kind: String,
        #[arg(long)]
        description_en: String,
        #[arg(long)]
        description_ar: String,
        /// Answer as `english|arabic`; repeat for each option.
        #[arg(long = "answer")]
        answers: Vec<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        group: RecordId,
        question: RecordId,
    },
}

// =============================================================================
// SETTINGS + LEDGERS + PREFS
// =============================================================================

#[derive(Args, Debug)]
struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SettingsSubcommand {
    Show,
    Update {
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        home_screen: Option<PathBuf>,
        #[arg(long)]
        splash_screen: Vec<PathBuf>,
        #[arg(long)]
        exercise_screen: Option<PathBuf>,
        /// Stored image id to remove; repeatable.
        #[arg(long = "delete-image")]
        images_to_delete: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LedgerScope {
    Coaches,
    Trainees,
}

#[derive(Args, Debug)]
struct LedgerArgs {
    #[arg(value_enum)]
    scope: LedgerScope,
    /// Show one party's ledger instead of the listing.
    id: Option<RecordId>,
    #[arg(long)]
    search: Option<String>,
    #[command(flatten)]
    dates: DateArgs,
}

#[derive(Args, Debug)]
struct PrefsCommand {
    #[command(subcommand)]
    command: PrefsSubcommand,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LanguageArg {
    En,
    Ar,
}

#[derive(Subcommand, Debug)]
enum PrefsSubcommand {
    Show,
    Theme { theme: ThemeArg },
    Language { language: LanguageArg },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    // A local .env may supply ADMIN_* variables; absence is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.base_url, cli.role_prefix, cli.state_path)?;
    let store = AdminStore::from_config(config)?;

    let result = run(&store, cli.command).await;
    if let Err(CliError::Client(ClientError::Api { status: 401, .. })) = &result {
        store.session.invalidate("token rejected by API");
    }
    result
}

/// Environment config with command-line overrides applied on top.
fn load_config(
    base_url: Option<String>,
    role_prefix: Option<String>,
    state_path: Option<PathBuf>,
) -> Result<AdminConfig, CliError> {
    let mut config = AdminConfig::from_env()?;
    if let Some(base_url) = base_url {
        config.base_url = normalize_base_url(&base_url)?;
    }
    if let Some(prefix) = role_prefix {
        let prefix = prefix.trim_matches('/');
        if !prefix.is_empty() {
            prefix.clone_into(&mut config.role_prefix);
        }
    }
    if let Some(path) = state_path {
        config.state_path = path;
    }
    Ok(config)
}

async fn run(store: &AdminStore, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => run_login(store, email, password).await,
        Command::Logout => {
            store.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            require(store, Route::Profile)?;
            print_json(&store.session.user())
        }
        Command::Users(users) => run_users(store, users).await,
        Command::Slides(slides) => run_slides(store, slides).await,
        Command::Topics(topics) => run_topics(store, topics).await,
        Command::Groups(groups) => run_groups(store, groups).await,
        Command::Questions(questions) => run_questions(store, questions).await,
        Command::Countries => {
            require(store, Route::Dashboard)?;
            print_json(&store.countries.list(ListQuery::default()).await?)
        }
        Command::Settings(settings) => run_settings(store, settings).await,
        Command::Ledger(args) => run_ledger(store, args).await,
        Command::Stats(dates) => {
            require(store, Route::Statistics)?;
            let mut page = DashboardPage::new(store.statistics.clone());
            print_json(&page.apply_dates(dates.range()).await?)
        }
        Command::Prefs(prefs) => run_prefs(store, prefs),
    }
}

/// Fail unless the session may open `route`.
fn require(store: &AdminStore, route: Route) -> Result<(), CliError> {
    match store.gate(&route.path()) {
        GateDecision::Allow(_) => Ok(()),
        GateDecision::Redirect(target) => Err(CliError::NotAuthenticated(target)),
    }
}

async fn run_login(store: &AdminStore, email: String, password: String) -> Result<(), CliError> {
    let page = LoginPage::new(&store.session);
    if page.mount().is_some() {
        eprintln!("already signed in; run `circle-admin logout` to switch accounts");
        return print_json(&store.session.user());
    }
    let (profile, _) = page.submit(Credentials { email, password }).await?;
    print_json(&profile)
}

async fn run_users(store: &AdminStore, users: UsersCommand) -> Result<(), CliError> {
    require(store, users.scope.route())?;
    let page = UsersPage::new(store.users.clone(), users.scope.mode());
    match users.command {
        UsersSubcommand::List { page: number, search } => {
            match search {
                Some(term) => page.search(&term).await?,
                None => page.mount().await?,
            };
            if number > 1 {
                page.change_page(number).await?;
            }
            let cursor = page.users().cursor();
            print_json(&json!({
                "items": page.users().items(),
                "page": cursor.current_page(),
                "last_page": cursor.last_page(),
                "total": cursor.total,
            }))
        }
        UsersSubcommand::Create { data } => {
            let payload = user_payload(store, &data).await?;
            print_json(&page.create(payload).await?)
        }
        UsersSubcommand::Update { id, data } => {
            let payload = user_payload(store, &data).await?;
            match page.update(id, payload).await? {
                Some(user) => print_json(&user),
                None => {
                    println!("updated user {id}");
                    Ok(())
                }
            }
        }
        UsersSubcommand::Delete { id } => {
            page.delete(id).await?;
            println!("deleted user {id}");
            Ok(())
        }
        UsersSubcommand::Restore { id } => print_json(&page.restore(id).await?),
    }
}

/// Parse a JSON form and fill `phone_country` from the chosen country.
async fn user_payload(store: &AdminStore, data: &str) -> Result<FormPayload, CliError> {
    let payload = FormPayload::from_json(serde_json::from_str::<Value>(data)?);
    if payload.get("country_id").is_none() {
        return Ok(payload);
    }
    let countries = store.countries.list(ListQuery::default()).await?;
    Ok(with_country(payload, &countries))
}

async fn run_slides(store: &AdminStore, slides: SlidesCommand) -> Result<(), CliError> {
    require(store, Route::Slider)?;
    let page = SliderPage::new(store.slides.clone());
    match slides.command {
        SlidesSubcommand::List => print_json(&page.mount().await?),
        SlidesSubcommand::Create { title, image } => {
            let image = read_attachment(&image)?;
            print_json(&page.create(slide_form(&title, image)).await?)
        }
        SlidesSubcommand::Delete { id } => delete_from(&page, "slide", id).await,
    }
}

async fn run_topics(store: &AdminStore, topics: TopicsCommand) -> Result<(), CliError> {
    require(store, Route::Topics)?;
    let page = TopicsPage::new(store.topics.clone());
    match topics.command {
        TopicsSubcommand::List => print_json(&page.mount().await?),
        TopicsSubcommand::Create { name_en, name_ar, slug } => {
            print_json(&page.create(topic_form(&name_en, &name_ar, &slug)).await?)
        }
        TopicsSubcommand::Delete { id } => delete_from(&page, "topic", id).await,
    }
}

async fn delete_from<R: Record>(page: &CatalogPage<R>, label: &str, id: RecordId) -> Result<(), CliError> {
    page.delete(id).await?;
    println!("deleted {label} {id}");
    Ok(())
}

async fn run_groups(store: &AdminStore, groups: GroupsCommand) -> Result<(), CliError> {
    require(store, Route::QuestionGroups)?;
    let mut page = QuestionGroupsPage::new(store.question_groups.clone(), store.question_scopes());
    match groups.command {
        GroupsSubcommand::List { search } => {
            page.mount().await?;
            let lang = store.preferences.current().language.code();
            print_json(&page.filter(search.as_deref().unwrap_or_default(), lang))
        }
        GroupsSubcommand::Create { title_en, title_ar } => {
            print_json(&page.create_group(group_form(&title_en, &title_ar)).await?)
        }
        GroupsSubcommand::Delete { id } => {
            page.delete_group(id).await?;
            println!("deleted question group {id}");
            Ok(())
        }
    }
}

async fn run_questions(store: &AdminStore, questions: QuestionsCommand) -> Result<(), CliError> {
    require(store, Route::QuestionGroups)?;
    let mut page = QuestionGroupsPage::new(store.question_groups.clone(), store.question_scopes());
    match questions.command {
        QuestionsSubcommand::List { group } => print_json(&page.open_group(group).await?),
        QuestionsSubcommand::Create { group, kind, description_en, description_ar, answers, image } => {
            let form = QuestionForm {
                kind,
                description_en,
                description_ar,
                answers: answers.iter().map(|raw| parse_answer(raw)).collect::<Result<_, _>>()?,
                image: image.as_deref().map(read_attachment).transpose()?,
            };
            print_json(&page.create_question(group, form).await?)
        }
        QuestionsSubcommand::Delete { group, question } => {
            page.delete_question(group, question).await?;
            println!("deleted question {question} from group {group}");
            Ok(())
        }
    }
}

fn parse_answer(raw: &str) -> Result<AnswerForm, CliError> {
    let Some((english, arabic)) = raw.split_once('|') else {
        return Err(CliError::InvalidAnswer(raw.to_owned()));
    };
    Ok(AnswerForm { description_en: english.trim().to_owned(), description_ar: arabic.trim().to_owned() })
}

async fn run_settings(store: &AdminStore, settings: SettingsCommand) -> Result<(), CliError> {
    require(store, Route::Settings)?;
    let page = SettingsPage::new(store.settings.clone());
    let loaded = page.mount().await?;
    match settings.command {
        SettingsSubcommand::Show => print_json(&loaded),
        SettingsSubcommand::Update { value, home_screen, splash_screen, exercise_screen, images_to_delete } => {
            let update = SettingsUpdate {
                value,
                home_screen: home_screen.as_deref().map(read_attachment).transpose()?,
                splash_screen: splash_screen
                    .iter()
                    .map(|path| read_attachment(path))
                    .collect::<Result<_, _>>()?,
                exercise_screen: exercise_screen.as_deref().map(read_attachment).transpose()?,
                images_to_delete,
            };
            print_json(&page.submit(update).await?)
        }
    }
}

async fn run_ledger(store: &AdminStore, args: LedgerArgs) -> Result<(), CliError> {
    let kind = match args.scope {
        LedgerScope::Coaches => LedgerKind::Coaches,
        LedgerScope::Trainees => LedgerKind::Trainees,
    };
    let route = match kind {
        LedgerKind::Coaches => Route::CoachesLedger(args.id),
        LedgerKind::Trainees => Route::TraineesLedger(args.id),
    };
    require(store, route)?;

    let mut page = LedgerPage::new(store.ledger(kind).clone()).with_range(args.dates.range());
    if let Some(id) = args.id {
        let detail = page.select(id).await?;
        return print_json(&detail.map(|detail| {
            json!({ "subject": detail.subject, "entries": detail.entries, "meta": detail.meta })
        }));
    }
    page.mount().await?;
    let rows = match args.search {
        Some(term) => page.search(&term),
        None => page.ledger().rows().items(),
    };
    print_json(&rows)
}

fn run_prefs(store: &AdminStore, prefs: PrefsCommand) -> Result<(), CliError> {
    match prefs.command {
        PrefsSubcommand::Show => {}
        PrefsSubcommand::Theme { theme } => match theme {
            ThemeArg::Light => store.preferences.set_theme(Theme::Light),
            ThemeArg::Dark => store.preferences.set_theme(Theme::Dark),
            ThemeArg::Toggle => {
                store.preferences.toggle_theme();
            }
        },
        PrefsSubcommand::Language { language } => store.preferences.set_language(match language {
            LanguageArg::En => Language::En,
            LanguageArg::Ar => Language::Ar,
        }),
    }
    let current = store.preferences.current();
    print_json(&json!({
        "theme": current.theme.as_str(),
        "language": current.language.code(),
        "rtl": current.language.is_rtl(),
    }))
}

fn read_attachment(path: &Path) -> Result<Attachment, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile { path: path.display().to_string(), source })?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    Ok(Attachment::new(file_name, bytes))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
