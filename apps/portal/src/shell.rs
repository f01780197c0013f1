use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::errors::FormError;
use crate::forms::{
    CatalogEntryForm, ForgotPasswordForm, JobForm, Notice, ProfileForm, ResetPasswordForm,
};
use crate::gateway::admin::CatalogKind;
use crate::gateway::Gateway;
use crate::models::job::{Job, SortField, SortOrder};
use crate::models::profile::ProfileFields;
use crate::models::user::Role;
use crate::pages::{JobBoard, MyJobs};
use crate::session::Session;

#[derive(Parser)]
#[command(name = "portal", version)]
#[command(about = "Terminal client for the job board")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Browse and bookmark public job postings
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Manage your own postings (employers)
    MyJobs {
        #[command(subcommand)]
        command: MyJobsCommand,
    },
    /// Admin: manage the skill catalog
    Skills {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Admin: manage job categories
    Categories {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Forgot / reset password
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },
    /// View and edit your profile
    Profile {
        /// Overrides PORTAL_USER_ROLE
        #[arg(long)]
        role: Option<Role>,
        #[command(subcommand)]
        command: ProfileCommand,
    },
    Notifications {
        #[command(subcommand)]
        command: NotificationsCommand,
    },
}

#[derive(Subcommand)]
pub enum JobsCommand {
    /// Search postings
    Search {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        salary_min: Option<u64>,
        #[arg(long)]
        skill: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one posting
    Show { id: i64 },
    /// Bookmark a posting
    Save { id: i64 },
    /// Remove a bookmark
    Unsave { id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    #[value(name = "created_at")]
    CreatedAt,
    Title,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

#[derive(clap::Args)]
pub struct JobFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub salary_range: Option<String>,
    #[arg(long)]
    pub emp_type: Option<String>,
    /// One per responsibility; repeatable
    #[arg(long = "responsibility")]
    pub responsibilities: Vec<String>,
    /// Skill name; unknown names are created. Repeatable
    #[arg(long = "skill")]
    pub skills: Vec<String>,
}

#[derive(Subcommand)]
pub enum MyJobsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, value_enum, default_value = "created_at")]
        sort: SortArg,
        #[arg(long, value_enum, default_value = "desc")]
        order: OrderArg,
    },
    /// Post a new job
    Post {
        #[command(flatten)]
        fields: JobFields,
    },
    /// Edit a posting; only the given fields change
    Edit {
        id: i64,
        #[command(flatten)]
        fields: JobFields,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    List,
    Add { name: String },
    /// Rename an entry
    Edit { id: i64, name: String },
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum PasswordCommand {
    /// Email a reset link
    Forgot { email: String },
    /// Set a new password using the emailed token
    Reset {
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Candidates only
        #[arg(long)]
        headline: Option<String>,
        /// Employers only
        #[arg(long)]
        company_name: Option<String>,
    },
    /// Upload a CV file (candidates)
    UploadCv { path: PathBuf },
}

#[derive(Subcommand)]
pub enum NotificationsCommand {
    List,
    /// Mark a notification as read
    Read { id: i64 },
}

pub async fn run(cli: Cli, gateway: &Gateway, session: &Session) -> Result<()> {
    match cli.command {
        Command::Jobs { command } => run_jobs(command, gateway).await,
        Command::MyJobs { command } => run_my_jobs(command, gateway).await,
        Command::Skills { command } => run_catalog(CatalogKind::Skill, command, gateway, session).await,
        Command::Categories { command } => {
            run_catalog(CatalogKind::Category, command, gateway, session).await
        }
        Command::Password { command } => run_password(command, gateway).await,
        Command::Profile { role, command } => {
            let role = role.unwrap_or_else(|| session.role_or(Role::Candidate));
            run_profile(command, role, gateway, session).await
        }
        Command::Notifications { command } => run_notifications(command, gateway).await,
    }
}

fn report(outcome: Result<Notice, FormError>) -> Result<()> {
    let notice = outcome?;
    println!("{notice}");
    Ok(())
}

fn print_job(job: &Job) {
    let saved = if job.is_saved == Some(true) { " ★" } else { "" };
    println!(
        "#{:<5} {}{} | {} | {}",
        job.id,
        job.title,
        saved,
        job.company.as_deref().unwrap_or("-"),
        job.location
    );
}

async fn run_jobs(command: JobsCommand, gateway: &Gateway) -> Result<()> {
    let mut board = JobBoard::new();
    match command {
        JobsCommand::Search {
            search,
            location,
            salary_min,
            skill,
            page,
        } => {
            board.update_filters(|f| {
                f.search = search.unwrap_or_default();
                f.location = location.unwrap_or_default();
                f.salary_min = salary_min;
                f.skill = skill.unwrap_or_default();
            });
            board.set_page(page);
            board.search(gateway).await?;
            // Past the end: fall back to the last page.
            if board.page() > board.total_pages().max(1) {
                board.set_page(page);
                board.search(gateway).await?;
            }
            for job in board.jobs() {
                print_job(job);
            }
            println!(
                "page {}/{} ({} jobs)",
                board.page(),
                board.total_pages().max(1),
                board.total()
            );
        }
        JobsCommand::Show { id } => {
            let job = gateway
                .get_job(id)
                .await
                .map_err(|e| FormError::from_gateway(&e, "Failed to load job"))?;
            print_job(&job);
            if !job.description.is_empty() {
                println!("\n{}", job.description);
            }
            for r in &job.responsibilities {
                println!("  - {r}");
            }
            if !job.skills.is_empty() {
                let names: Vec<&str> = job.skills.iter().map(|s| s.name.as_str()).collect();
                println!("skills: {}", names.join(", "));
            }
        }
        JobsCommand::Save { id } => report(board.set_saved(gateway, id, true).await)?,
        JobsCommand::Unsave { id } => report(board.set_saved(gateway, id, false).await)?,
    }
    Ok(())
}

/// Resolves skill names against the selector, creating the ones it does not know.
async fn select_skills(form: &mut JobForm, gateway: &Gateway, names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Ok(());
    }
    if let Err(e) = form.load_skills(gateway).await {
        println!("{}", e.notice());
    }
    for name in names {
        let existing = form
            .skills
            .known_options()
            .find(|s| s.name_matches(name.trim()))
            .map(|s| s.id);
        match existing {
            Some(id) => {
                form.skills.select(id);
            }
            None => {
                form.skills.set_search(name.as_str());
                report(form.skills.create(gateway).await)?;
            }
        }
    }
    Ok(())
}

fn apply_fields(form: &mut JobForm, fields: &JobFields) {
    let draft = &mut form.draft;
    let pairs = [
        (&mut draft.title, &fields.title),
        (&mut draft.description, &fields.description),
        (&mut draft.location, &fields.location),
        (&mut draft.company, &fields.company),
        (&mut draft.salary_range, &fields.salary_range),
        (&mut draft.emp_type, &fields.emp_type),
    ];
    for (target, value) in pairs {
        if let Some(v) = value {
            *target = v.clone();
        }
    }
    if !fields.responsibilities.is_empty() {
        draft.set_responsibilities_text(&fields.responsibilities.join("\n"));
    }
}

async fn run_my_jobs(command: MyJobsCommand, gateway: &Gateway) -> Result<()> {
    let mut page = MyJobs::new();
    match command {
        MyJobsCommand::List { page: n, sort, order } => {
            page.set_sort(match sort {
                SortArg::CreatedAt => SortField::CreatedAt,
                SortArg::Title => SortField::Title,
            });
            page.set_order(match order {
                OrderArg::Asc => SortOrder::Asc,
                OrderArg::Desc => SortOrder::Desc,
            });
            page.set_page(n);
            page.refresh(gateway).await?;
            for job in page.jobs() {
                print_job(job);
            }
            println!(
                "page {}/{} ({} jobs)",
                page.query().page,
                page.total_pages().max(1),
                page.total()
            );
        }
        MyJobsCommand::Post { fields } => {
            let mut form = JobForm::create(Vec::new());
            apply_fields(&mut form, &fields);
            form.validate()?;
            select_skills(&mut form, gateway, &fields.skills).await?;
            report(form.submit(gateway).await)?;
            page.job_added(gateway).await?;
        }
        MyJobsCommand::Edit { id, fields } => {
            let job = gateway
                .get_job(id)
                .await
                .map_err(|e| FormError::from_gateway(&e, "Failed to load job"))?;
            let mut form = JobForm::edit(&job, Vec::new());
            apply_fields(&mut form, &fields);
            if !fields.skills.is_empty() {
                form.skills.clear_selection();
            }
            select_skills(&mut form, gateway, &fields.skills).await?;
            report(form.submit(gateway).await)?;
        }
        MyJobsCommand::Delete { id } => {
            report(page.delete(gateway, id).await)?;
        }
    }
    Ok(())
}

async fn run_catalog(
    kind: CatalogKind,
    command: CatalogCommand,
    gateway: &Gateway,
    session: &Session,
) -> Result<()> {
    let token = session.require_token()?;
    match command {
        CatalogCommand::List => {
            let entries: Vec<(i64, String)> = match kind {
                CatalogKind::Skill => gateway
                    .list_skills(token)
                    .await
                    .map(|v| v.into_iter().map(|s| (s.id, s.name)).collect::<Vec<_>>()),
                CatalogKind::Category => gateway
                    .list_categories(token)
                    .await
                    .map(|v| v.into_iter().map(|c| (c.id, c.name)).collect::<Vec<_>>()),
            }
            .map_err(|e| FormError::from_gateway(&e, "Failed to load entries"))?;
            for (id, name) in entries {
                println!("#{id:<5} {name}");
            }
        }
        CatalogCommand::Add { name } => {
            let mut form = CatalogEntryForm::add(kind);
            form.name = name;
            report(form.submit(gateway, token).await)?;
        }
        CatalogCommand::Edit { id, name } => {
            let mut form = CatalogEntryForm::edit(kind, id, name);
            report(form.submit(gateway, token).await)?;
        }
        CatalogCommand::Delete { id } => {
            let result = match kind {
                CatalogKind::Skill => gateway.delete_skill(token, id).await,
                CatalogKind::Category => gateway.delete_category(token, id).await,
            };
            result.map_err(|e| FormError::from_gateway(&e, "Failed to delete entry"))?;
            println!("{}", Notice::success(format!("Deleted {} #{id}", kind.label())));
        }
    }
    Ok(())
}

async fn run_password(command: PasswordCommand, gateway: &Gateway) -> Result<()> {
    match command {
        PasswordCommand::Forgot { email } => {
            let mut form = ForgotPasswordForm::new();
            form.email = email;
            report(form.submit(gateway).await)?;
        }
        PasswordCommand::Reset {
            token,
            password,
            confirm,
        } => {
            let mut form = ResetPasswordForm::new(Some(token));
            form.verify_token(gateway).await?;
            form.password = password;
            form.confirmation = confirm;
            if let Some(strength) = form.strength() {
                info!(?strength, "new password strength");
            }
            report(form.submit(gateway).await)?;
            if let Some(delay) = form.redirect_after() {
                tokio::time::sleep(delay).await;
                println!("You can now sign in with your new password.");
            }
        }
    }
    Ok(())
}

async fn run_profile(command: ProfileCommand, role: Role, gateway: &Gateway, session: &Session) -> Result<()> {
    let mut form = ProfileForm::new(session.user_id(), role);
    form.load(gateway).await?;

    match command {
        ProfileCommand::Show => print_profile(&form.fields),
        ProfileCommand::Update {
            full_name,
            email,
            location,
            headline,
            company_name,
        } => {
            match &mut form.fields {
                ProfileFields::Candidate(f) => {
                    overwrite(&mut f.full_name, full_name);
                    overwrite(&mut f.email, email);
                    overwrite(&mut f.location, location);
                    overwrite(&mut f.headline, headline);
                }
                ProfileFields::Employer(f) => {
                    overwrite(&mut f.full_name, full_name);
                    overwrite(&mut f.email, email);
                    overwrite(&mut f.location, location);
                    overwrite(&mut f.company_name, company_name);
                }
            }
            report(form.submit(gateway).await)?;
            print_profile(&form.fields);
        }
        ProfileCommand::UploadCv { path } => {
            let path = path
                .canonicalize()
                .with_context(|| format!("CV file not found: {}", path.display()))?;
            report(form.upload_cv_file(gateway, &path).await)?;
        }
    }
    Ok(())
}

fn overwrite(target: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn print_profile(fields: &ProfileFields) {
    println!("{} ({})", fields.full_name(), fields.role());
    if !fields.email().is_empty() {
        println!("email:    {}", fields.email());
    }
    match fields {
        ProfileFields::Candidate(f) => {
            println!("headline: {}", f.headline);
            println!("location: {}", f.location);
            println!("cv:       {}", f.cv_url.as_deref().unwrap_or("(none)"));
        }
        ProfileFields::Employer(f) => {
            println!("company:  {}", f.company_name);
            println!("industry: {}", f.industry);
            println!("location: {}", f.location);
        }
    }
}

async fn run_notifications(command: NotificationsCommand, gateway: &Gateway) -> Result<()> {
    match command {
        NotificationsCommand::List => {
            let items = gateway
                .list_notifications()
                .await
                .map_err(|e| FormError::from_gateway(&e, "Failed to load notifications"))?;
            if items.is_empty() {
                println!("No notifications");
            }
            for n in items {
                let mark = if n.is_read { " " } else { "•" };
                println!("{mark} #{:<5} {}", n.id, n.message);
            }
        }
        NotificationsCommand::Read { id } => {
            gateway
                .mark_notification_read(id)
                .await
                .map_err(|e| FormError::from_gateway(&e, "Failed to update notification"))?;
            println!("{}", Notice::success("Marked as read"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_post_collects_repeated_skills() {
        let cli = Cli::try_parse_from([
            "portal", "my-jobs", "post", "--title", "SRE", "--skill", "Rust", "--skill", "Kubernetes",
        ])
        .unwrap();
        match cli.command {
            Command::MyJobs {
                command: MyJobsCommand::Post { fields },
            } => {
                assert_eq!(fields.title.as_deref(), Some("SRE"));
                assert_eq!(fields.skills, vec!["Rust", "Kubernetes"]);
            }
            _ => panic!("expected my-jobs post"),
        }
    }

    #[test]
    fn test_profile_role_parsed() {
        let cli = Cli::try_parse_from(["portal", "profile", "--role", "employer", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Profile {
                role: Some(Role::Employer),
                command: ProfileCommand::Show
            }
        ));
    }

    #[test]
    fn test_apply_fields_only_overrides_given_values() {
        let mut form = JobForm::create(Vec::new());
        form.draft.location = "Paris".to_string();
        let fields = JobFields {
            title: Some("SRE".to_string()),
            description: None,
            location: None,
            company: None,
            salary_range: None,
            emp_type: None,
            responsibilities: vec!["On-call".to_string(), "Automate".to_string()],
            skills: vec![],
        };
        apply_fields(&mut form, &fields);
        assert_eq!(form.draft.title, "SRE");
        assert_eq!(form.draft.location, "Paris");
        assert_eq!(form.draft.responsibilities, vec!["On-call", "Automate"]);
    }
}
