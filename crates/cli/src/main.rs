//! URQuest command-line client
//!
//! ```bash
//! urquest login ada --password hunter2
//! urquest tasks
//! urquest submit 3 https://proof.example/3
//! urquest org create "Lantern Guild"
//! urquest reviews approve 8
//! ```

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use urquest_client::{ClientConfig, ClientError, NoticeLevel, QuestApp};
use urquest_core::org::{OrgIdentityUpdate, RoleDraft};
use urquest_core::profile::{ranked, Medal};
use urquest_core::quest::{Difficulty, QuestDraft};
use urquest_core::session::UserId;
use urquest_core::submission::ReviewAction;
use urquest_core::Capabilities;

#[derive(Parser)]
#[command(name = "urquest")]
#[command(about = "Quests, organizations and reviews from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides URQUEST_API_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Directory holding the session file (overrides URQUEST_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login(Credentials),

    /// Create an account
    Register(Credentials),

    /// Forget the saved session
    Logout,

    /// Show the current session and what it allows
    Whoami,

    /// List quests you can take on
    Tasks,

    /// Submit proof for a quest
    Submit {
        #[arg(value_name = "TASK_ID")]
        task_id: i64,

        #[arg(value_name = "PROOF_LINK")]
        proof_link: String,
    },

    /// Show your profile and history
    Profile,

    /// Show the global leaderboard
    Leaderboard,

    /// List organizations
    Orgs,

    /// Organization management
    Org {
        #[command(subcommand)]
        subcommand: OrgCommands,
    },

    /// Organization roles
    Roles {
        #[command(subcommand)]
        subcommand: RoleCommands,
    },

    /// Quest authoring
    Task {
        #[command(subcommand)]
        subcommand: TaskCommands,
    },

    /// Submission review queue
    Reviews {
        #[command(subcommand)]
        subcommand: ReviewCommands,
    },
}

#[derive(Args)]
struct Credentials {
    #[arg(value_name = "USERNAME")]
    username: String,

    #[arg(short, long)]
    password: String,
}

#[derive(Subcommand)]
enum OrgCommands {
    /// Public profile of an organization
    Show {
        #[arg(value_name = "ORG_ID")]
        org_id: i64,
    },

    /// Found an organization
    Create {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Join an organization
    Join {
        #[arg(value_name = "ORG_ID")]
        org_id: i64,
    },

    /// Leave your organization
    Leave,

    /// Active quests and pending reviews
    Stats,

    /// List members
    Members,

    /// Edit the identity of the organization you own
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_name = "URL")]
        image_url: Option<String>,
    },

    /// Hand ownership to another member
    Transfer {
        #[arg(value_name = "USER_ID")]
        new_owner_id: String,
    },
}

#[derive(Subcommand)]
enum RoleCommands {
    /// List roles by rank
    List,

    /// Create a role
    Create {
        #[arg(value_name = "NAME")]
        name: String,

        /// Lower ranks sort first
        #[arg(long, default_value_t = 10)]
        rank: i64,

        /// Holders may create and review quests
        #[arg(long)]
        can_create_task: bool,
    },

    /// Give a member a role
    Assign {
        #[arg(value_name = "USER_ID")]
        user_id: String,

        #[arg(value_name = "ROLE_ID")]
        role_id: i64,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Publish a quest
    Create {
        #[arg(long)]
        title: String,

        #[arg(long, value_name = "XP")]
        xp: i64,

        #[arg(long, default_value = "")]
        description: String,

        /// Easy, Medium or Hard
        #[arg(long, default_value = "Easy")]
        difficulty: Difficulty,

        /// YYYY-MM-DD
        #[arg(long)]
        deadline: Option<NaiveDate>,

        /// Make the quest private to these users (repeatable)
        #[arg(long = "private-to", value_name = "USER_ID")]
        private_to: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// Pending submissions
    List,

    /// Approve a submission
    Approve {
        #[arg(value_name = "SUBMISSION_ID")]
        submission_id: i64,

        #[arg(long)]
        feedback: Option<String>,
    },

    /// Reject a submission
    Reject {
        #[arg(value_name = "SUBMISSION_ID")]
        submission_id: i64,

        #[arg(long)]
        feedback: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbosity > 0 {
        "urquest=debug,urquest_client=debug,urquest_core=debug"
    } else {
        "urquest=info,urquest_client=info,urquest_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url.clone() {
        config = config.with_api_base_url(url);
    }
    if let Some(dir) = cli.data_dir.clone() {
        config = config.with_data_dir(dir);
    }
    tracing::debug!(api = %config.api_base_url, data_dir = ?config.data_dir, "Client configured");

    let app = QuestApp::from_config(&config).await;

    // Print notices as they arrive; the channel closes when the app is dropped
    let mut notices = app.notifier().subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(notice) => match notice.level {
                    NoticeLevel::Success => eprintln!(">> {}", notice.message),
                    NoticeLevel::Error => eprintln!("!! {}", notice.message),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dropped notices");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let outcome = run(cli.command, &app).await;
    drop(app);
    let _ = printer.await;

    if let Err(error) = outcome {
        // Client errors were already shown as notices
        match error.downcast_ref::<ClientError>() {
            Some(ClientError::Session(source)) => {
                tracing::error!(error = ?source, "Session storage failed");
                eprintln!(
                    "Session could not be stored under {}",
                    config.data_dir.display()
                );
            }
            Some(_) => {}
            None => eprintln!("Error: {:#}", error),
        }
        process::exit(1);
    }
}

async fn run(command: Commands, app: &QuestApp) -> anyhow::Result<()> {
    match command {
        Commands::Login(creds) => {
            let session = app.login(&creds.username, &creds.password).await?;
            println!("Logged in as {}", session.user.username);
        }
        Commands::Register(creds) => {
            app.register(&creds.username, &creds.password).await?;
        }
        Commands::Logout => {
            app.logout().await?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let session = app.session().await;
            match &session {
                Some(session) => {
                    println!("{} ({})", session.user.username, session.user.id);
                    println!("XP: {}", session.user.total_xp);
                    if let Some(org) = session.org_name() {
                        println!("Organization: {}", org);
                    }
                    if let Some(role) = &session.user.role_name {
                        println!("Role: {}", role);
                    }
                }
                None => println!("Not logged in"),
            }
            let caps = Capabilities::derive(session.as_ref());
            println!("{}", serde_json::to_string_pretty(&caps)?);
        }
        Commands::Tasks => {
            let quests = app.available_tasks().await?;
            if quests.is_empty() {
                println!("NO MISSIONS DETECTED.");
            }
            for quest in quests {
                println!(
                    "#{:<5} {:<7} {:>5} XP  {}  [{}]",
                    quest.task_id,
                    quest.difficulty,
                    quest.xp_reward,
                    quest.title,
                    quest.org_name.as_deref().unwrap_or("-"),
                );
                if let Some(deadline) = quest.deadline {
                    println!("       due {}", deadline);
                }
            }
        }
        Commands::Submit {
            task_id,
            proof_link,
        } => {
            app.submit_proof(task_id, &proof_link).await?;
        }
        Commands::Profile => {
            let profile = app.profile().await?;
            println!(
                "{}  LVL {}  {} XP  rank #{}",
                profile.username,
                profile.level(),
                profile.total_xp,
                profile
                    .rank
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
            if !profile.history.is_empty() {
                println!("History ({} XP approved):", profile.approved_xp());
            }
            for entry in &profile.history {
                println!("  {:<9} {}", entry.status, entry.title);
            }
        }
        Commands::Leaderboard => {
            let entries = app.leaderboard().await?;
            for (position, entry) in ranked(&entries) {
                let medal = match Medal::for_position(position) {
                    Some(Medal::Gold) => "*",
                    Some(Medal::Silver) => "+",
                    Some(Medal::Bronze) => "-",
                    None => " ",
                };
                println!(
                    "{} #{:<3} {:<20} {} XP",
                    medal, position, entry.username, entry.total_xp
                );
            }
        }
        Commands::Orgs => {
            for org in app.list_orgs().await? {
                println!("#{:<5} {}", org.org_id, org.name);
            }
        }
        Commands::Org { subcommand } => run_org(subcommand, app).await?,
        Commands::Roles { subcommand } => run_roles(subcommand, app).await?,
        Commands::Task { subcommand } => match subcommand {
            TaskCommands::Create {
                title,
                xp,
                description,
                difficulty,
                deadline,
                private_to,
            } => {
                let mut draft = QuestDraft::new(title, xp)
                    .with_description(description)
                    .with_difficulty(difficulty);
                if let Some(deadline) = deadline {
                    draft = draft.with_deadline(deadline);
                }
                if !private_to.is_empty() {
                    draft = draft.private_to(private_to.into_iter().map(UserId::from));
                }
                app.create_task(draft).await?;
            }
        },
        Commands::Reviews { subcommand } => match subcommand {
            ReviewCommands::List => {
                let items = app.reviews().await?;
                if items.is_empty() {
                    println!("NO PENDING TRANSMISSIONS");
                }
                for item in items {
                    println!(
                        "#{:<5} {} by {} (+{} XP)\n       {}",
                        item.submission_id,
                        item.task_title,
                        item.student_name,
                        item.xp_reward,
                        item.proof_link
                    );
                }
            }
            ReviewCommands::Approve {
                submission_id,
                feedback,
            } => {
                app.review(submission_id, ReviewAction::Approve, feedback.as_deref())
                    .await?;
            }
            ReviewCommands::Reject {
                submission_id,
                feedback,
            } => {
                app.review(submission_id, ReviewAction::Reject, feedback.as_deref())
                    .await?;
            }
        },
    }
    Ok(())
}

async fn run_org(command: OrgCommands, app: &QuestApp) -> anyhow::Result<()> {
    match command {
        OrgCommands::Show { org_id } => {
            let org = app.public_org(org_id).await?;
            println!("{} (#{})", org.name, org.org_id);
            if let Some(description) = &org.description {
                println!("{}", description);
            }
            if let Some(owner) = &org.owner_username {
                println!("Owner: {}", owner);
            }
            for quest in &org.tasks {
                println!("  #{:<5} {:>5} XP  {}", quest.task_id, quest.xp_reward, quest.title);
            }
        }
        OrgCommands::Create { name } => {
            app.create_org(&name).await?;
        }
        OrgCommands::Join { org_id } => {
            app.join_org(org_id).await?;
        }
        OrgCommands::Leave => {
            app.leave_org().await?;
        }
        OrgCommands::Stats => {
            let stats = app.org_stats().await?;
            println!("Active quests:       {}", stats.active_tasks);
            println!("Pending submissions: {}", stats.pending_submissions);
        }
        OrgCommands::Members => {
            for member in app.members().await? {
                println!(
                    "{:<12} {:<20} {:>6} XP  {}",
                    member.user_id,
                    member.username,
                    member.total_xp,
                    member.role_name.as_deref().unwrap_or("")
                );
            }
        }
        OrgCommands::Update {
            name,
            description,
            image_url,
        } => {
            app.update_org(OrgIdentityUpdate {
                name,
                description,
                image_url,
            })
            .await?;
        }
        OrgCommands::Transfer { new_owner_id } => {
            app.transfer_ownership(&UserId::from(new_owner_id)).await?;
        }
    }
    Ok(())
}

async fn run_roles(command: RoleCommands, app: &QuestApp) -> anyhow::Result<()> {
    match command {
        RoleCommands::List => {
            for role in app.roles().await? {
                let rights = if role.can_create_task { "creator" } else { "" };
                println!("#{:<4} rank {:<3} {:<20} {}", role.role_id, role.rank, role.name, rights);
            }
        }
        RoleCommands::Create {
            name,
            rank,
            can_create_task,
        } => {
            let mut draft = RoleDraft::new(name, rank);
            if can_create_task {
                draft = draft.with_creation_rights();
            }
            app.create_role(draft).await?;
        }
        RoleCommands::Assign { user_id, role_id } => {
            app.assign_role(&UserId::from(user_id), role_id).await?;
        }
    }
    Ok(())
}
