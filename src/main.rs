//! CITC portal command-line client.
//!
//! Drives the theme, session, route guards and admin screens of the club portal against a running
//! backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use citc_portal::admin::EventForm;
use citc_portal::config::Config;
use citc_portal::errors::AppError;
use citc_portal::guards::GuardDecision;
use citc_portal::models::{
    Event, EventType, LoginRequest, Roster, SignupRequest, SocialLinks, TeamCategory, TeamMember,
    TeamMemberInput,
};
use citc_portal::routes::{Navigation, Page};
use citc_portal::storage::MemoryStorage;
use citc_portal::Portal;

#[derive(Debug, Parser)]
#[command(name = "citc", version, about = "CITC club portal client")]
struct Cli {
    /// Keep theme and session in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the active theme, or cycle it
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CITC_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        roll_no: Option<String>,
        #[arg(long)]
        semester: Option<String>,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CITC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Resolve a portal path through the route guards
    Open { path: String },
    /// Browse and manage events
    Events {
        #[command(subcommand)]
        action: EventsAction,
    },
    /// Browse and manage team members
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },
}

#[derive(Debug, Subcommand)]
enum ThemeAction {
    /// Switch to the next theme (light -> blue -> dark)
    Toggle,
}

#[derive(Debug, Subcommand)]
enum EventsAction {
    List,
    Show {
        slug: String,
    },
    Create(EventFields),
    /// Edit the event with this slug; only the given fields change
    Update {
        slug: String,
        #[command(flatten)]
        fields: EventFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Args)]
struct EventFields {
    #[arg(long)]
    title: Option<String>,
    /// Defaults to a slug derived from the title
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long = "type", value_parser = parse_event_type)]
    event_type: Option<EventType>,
    /// RFC 3339 timestamp, e.g. 2026-11-14T10:00:00Z
    #[arg(long)]
    start: Option<DateTime<Utc>>,
    #[arg(long)]
    end: Option<DateTime<Utc>>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    capacity: Option<u32>,
    #[arg(long)]
    image: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    organizer: Option<String>,
}

impl EventFields {
    fn apply(self, form: &mut EventForm) {
        if let Some(title) = self.title {
            form.set_title(&title);
        }
        if let Some(slug) = self.slug {
            form.set_slug(&slug);
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(event_type) = self.event_type {
            form.event_type = event_type;
        }
        if self.start.is_some() {
            form.start_at = self.start;
        }
        if self.end.is_some() {
            form.end_at = self.end;
        }
        if let Some(location) = self.location {
            form.location = location;
        }
        if let Some(capacity) = self.capacity {
            form.capacity = capacity;
        }
        if let Some(image) = self.image {
            form.image = image;
        }
        if let Some(tags) = self.tags {
            form.tags_input = tags;
        }
        if let Some(organizer) = self.organizer {
            form.organizer = organizer;
        }
    }
}

#[derive(Debug, Subcommand)]
enum TeamAction {
    List {
        /// Group active members the way the team page does
        #[arg(long)]
        roster: bool,
    },
    Show {
        id: String,
    },
    Create(TeamFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: TeamFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Args)]
struct TeamFields {
    #[arg(long)]
    name: Option<String>,
    /// Title shown on the card, e.g. "Faculty Advisor"
    #[arg(long)]
    role: Option<String>,
    /// mentor or executiveCommittee
    #[arg(long, value_parser = parse_category)]
    category: Option<TeamCategory>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    bio: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    #[arg(long)]
    github: Option<String>,
    #[arg(long)]
    twitter: Option<String>,
    #[arg(long)]
    order: Option<i32>,
    #[arg(long)]
    active: Option<bool>,
}

impl TeamFields {
    fn apply(self, input: &mut TeamMemberInput) {
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(role) = self.role {
            input.role = role;
        }
        if let Some(category) = self.category {
            input.category = category;
        }
        // An empty value clears the field
        if let Some(image) = self.image {
            input.image = non_empty(image);
        }
        if let Some(bio) = self.bio {
            input.bio = non_empty(bio);
        }

        let mut social = input.social.take().unwrap_or_default();
        if let Some(email) = self.email {
            social.email = non_empty(email);
        }
        if let Some(linkedin) = self.linkedin {
            social.linkedin = non_empty(linkedin);
        }
        if let Some(github) = self.github {
            social.github = non_empty(github);
        }
        if let Some(twitter) = self.twitter {
            social.twitter = non_empty(twitter);
        }
        input.social = (!social.is_empty()).then_some(social);

        if self.order.is_some() {
            input.order = self.order;
        }
        if self.active.is_some() {
            input.is_active = self.active;
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

fn parse_event_type(s: &str) -> Result<EventType, String> {
    EventType::parse(s).ok_or_else(|| {
        "expected one of: workshop, hackathon, tech-talk, coding-challenge".to_string()
    })
}

fn parse_category(s: &str) -> Result<TeamCategory, String> {
    TeamCategory::parse(s).ok_or_else(|| "expected mentor or executiveCommittee".to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    // Initialize logging on stderr so command output stays clean
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("API URL: {}", config.api_url);
    tracing::debug!("State path: {:?}", config.state_path);

    let portal = if cli.ephemeral {
        Portal::with_storage(config, Arc::new(MemoryStorage::new())).await
    } else {
        Portal::start(config).await
    };

    let result = match portal {
        Ok(portal) => run(&portal, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e.message());
        if let AppError::Validation(errors) = &e {
            for error in errors.iter() {
                eprintln!("  {}: {}", error.field, error.message);
            }
        }
        std::process::exit(1);
    }
}

async fn run(portal: &Portal, command: Command) -> Result<(), AppError> {
    match command {
        Command::Theme { action } => {
            let theme = match action {
                Some(ThemeAction::Toggle) => portal.theme.toggle_theme(),
                None => portal.theme.theme(),
            };
            let root = portal.theme.root();
            println!(
                "Theme: {} ({}), theme-color {}",
                theme,
                theme.label(),
                root.meta(citc_portal::theme::THEME_COLOR_META)
                    .unwrap_or(theme.chrome_color())
            );
        }
        Command::Signup {
            name,
            email,
            password,
            roll_no,
            semester,
        } => {
            let request = SignupRequest {
                name,
                email,
                password,
                roll_no,
                semester,
            };
            let session = portal.api.register(&request).await?;
            println!("Welcome, {}! Signed in as {}.", session.first_name(), session.role);
            print_landing(portal, "/dashboard");
        }
        Command::Login { email, password } => {
            let session = portal.api.login(&LoginRequest { email, password }).await?;
            println!("Signed in as {} ({}).", session.name, session.role);
            print_landing(portal, "/dashboard");
        }
        Command::Logout => {
            portal.api.logout();
            println!("Signed out.");
        }
        Command::Whoami => match portal.auth.current_user() {
            Some(session) => {
                println!("{} <{}>", session.name, session.email);
                println!("Role: {} ({})", session.role, session.role.dashboard_title());
            }
            None => println!("Not signed in."),
        },
        Command::Open { path } => print_landing(portal, &path),
        Command::Events { action } => run_events(portal, action).await?,
        Command::Team { action } => run_team(portal, action).await?,
    }
    Ok(())
}

fn print_landing(portal: &Portal, path: &str) {
    let resolution = portal.navigate(path);
    for hop in &resolution.redirects {
        println!("-> redirected to {}", hop);
    }
    match resolution.outcome {
        Navigation::Render(page) => println!("{}", page),
        Navigation::Loading(page) => println!("Loading... ({})", page.path()),
    }
}

/// Writes go through the admin dashboard; refuse them unless its guard admits the session.
fn require_admin(portal: &Portal) -> Result<(), AppError> {
    let state = portal.auth.state();
    let guard = Page::AdminDashboard.guard();
    match guard.map(|g| g.check(&state)) {
        None | Some(GuardDecision::Allow) => Ok(()),
        Some(GuardDecision::Loading) => Err(AppError::Unauthorized(
            "Session is still loading".to_string(),
        )),
        Some(GuardDecision::RedirectTo(path)) => Err(AppError::Unauthorized(format!(
            "Admin access required (redirected to {})",
            path
        ))),
    }
}

async fn run_events(portal: &Portal, action: EventsAction) -> Result<(), AppError> {
    let mut manager = portal.event_manager();
    match action {
        EventsAction::List => {
            let events = manager.refresh().await?;
            if events.is_empty() {
                println!("No events scheduled.");
            }
            for event in events {
                print_event_line(event);
            }
        }
        EventsAction::Show { slug } => {
            let event = portal.api.get_event(&slug).await?;
            print_event(&event);
        }
        EventsAction::Create(fields) => {
            require_admin(portal)?;
            let mut form = EventForm::new();
            fields.apply(&mut form);
            let event = manager.save(&form).await?;
            println!("Created event {} ({})", event.title, event.id);
            print_event(&event);
        }
        EventsAction::Update { slug, fields } => {
            require_admin(portal)?;
            let existing = portal.api.get_event(&slug).await?;
            let mut form = EventForm::edit(&existing);
            fields.apply(&mut form);
            let event = manager.save(&form).await?;
            println!("Updated event {} ({})", event.title, event.id);
        }
        EventsAction::Delete { id } => {
            require_admin(portal)?;
            manager.delete(&id).await?;
            println!("Deleted event {}. {} remaining.", id, manager.events().len());
        }
    }
    Ok(())
}

fn print_event_line(event: &Event) {
    println!(
        "{}  {:<16} {:<32} {}  {}",
        event.start_at.format("%b %d, %Y"),
        event.event_type.label(),
        event.title,
        event.location,
        event.slug
    );
}

fn print_event(event: &Event) {
    println!("{} [{}]", event.title, event.event_type.label());
    println!("  slug:      {}", event.slug);
    println!(
        "  when:      {} - {}",
        event.start_at.format("%b %d, %Y %H:%M"),
        event.end_at.format("%b %d, %Y %H:%M")
    );
    println!("  where:     {}", event.location);
    println!(
        "  capacity:  {} ({} seats left)",
        event.capacity,
        event.seats_left()
    );
    if let Some(organizer) = &event.organizer {
        println!("  organizer: {}", organizer);
    }
    if !event.tags.is_empty() {
        println!("  tags:      {}", event.tags.join(", "));
    }
    if !event.description.is_empty() {
        println!();
        println!("{}", event.description);
    }
}

async fn run_team(portal: &Portal, action: TeamAction) -> Result<(), AppError> {
    let mut manager = portal.team_manager();
    match action {
        TeamAction::List { roster } => {
            manager.refresh().await?;
            if roster {
                print_roster(&manager.roster());
            } else {
                for member in manager.members() {
                    print_member_line(member);
                }
            }
        }
        TeamAction::Show { id } => {
            let member = portal.api.get_team_member(&id).await?;
            print_member_line(&member);
            if let Some(bio) = &member.bio {
                println!("  {}", bio);
            }
            if let Some(social) = &member.social {
                print_social(social);
            }
        }
        TeamAction::Create(fields) => {
            require_admin(portal)?;
            let mut input = TeamMemberInput {
                name: String::new(),
                role: String::new(),
                category: TeamCategory::ExecutiveCommittee,
                image: None,
                bio: None,
                social: None,
                order: None,
                is_active: None,
            };
            fields.apply(&mut input);
            let member = manager.save(None, &input).await?;
            println!("Created team member {} ({})", member.name, member.id);
        }
        TeamAction::Update { id, fields } => {
            require_admin(portal)?;
            let existing = portal.api.get_team_member(&id).await?;
            let mut input = TeamMemberInput::from(&existing);
            fields.apply(&mut input);
            let member = manager.save(Some(&id), &input).await?;
            println!("Updated team member {} ({})", member.name, member.id);
        }
        TeamAction::Delete { id } => {
            require_admin(portal)?;
            manager.delete(&id).await?;
            println!(
                "Deleted team member {}. {} remaining.",
                id,
                manager.members().len()
            );
        }
    }
    Ok(())
}

fn print_member_line(member: &TeamMember) {
    println!(
        "{:>3}  {:<28} {:<24} {}{}",
        member.order,
        member.name,
        member.role,
        member.category.heading(),
        if member.is_active { "" } else { " (inactive)" }
    );
}

fn print_roster(roster: &Roster) {
    for (category, members) in roster.sections() {
        println!("{}", category.heading());
        if members.is_empty() {
            println!("  (none)");
        }
        for member in members {
            println!("  {} - {}", member.name, member.role);
        }
    }
}

fn print_social(social: &SocialLinks) {
    let links = [
        ("email", &social.email),
        ("linkedin", &social.linkedin),
        ("github", &social.github),
        ("twitter", &social.twitter),
    ];
    for (label, value) in links {
        if let Some(value) = value {
            println!("  {:<9} {}", label, value);
        }
    }
}
