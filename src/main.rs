use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use staffdesk::api::types::{Employee, EmployeeForm};
use staffdesk::router::RouteName;
use staffdesk::{App, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line front end for the employee-management dashboard API.
#[derive(Parser, Debug)]
#[command(name = "staffdesk", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session.
    Login {
        #[arg(long, env = "STAFFDESK_EMAIL")]
        email: String,
        #[arg(long, env = "STAFFDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and clear the stored session.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Resolve a dashboard path through the route guard.
    Navigate { path: String },

    /// Employee listing and CRUD.
    #[command(subcommand)]
    Employees(EmployeeCommands),

    /// List departments.
    Departments,

    /// List job positions.
    Positions,
}

#[derive(Subcommand, Debug)]
enum EmployeeCommands {
    /// List one page of employees.
    List {
        /// Zero-based page index.
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Create an employee.
    Add(EmployeeArgs),

    /// Update an existing employee.
    Update {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        employee: EmployeeArgs,
    },

    /// Delete an employee by id.
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct EmployeeArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    gender: String,
    #[arg(long)]
    phone: String,
    /// Date of birth as YYYY-MM-DD.
    #[arg(long)]
    date_of_birth: NaiveDate,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long)]
    department_id: Option<i64>,
    #[arg(long)]
    job_position_id: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = Settings::new().context("Failed to load configuration")?;

    // Initialize logging
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Configuration loaded successfully ({})", config.environment);

    let app = App::new(config)?;
    run(&app, cli.command).await
}

async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            app.router.push("/auth/login").await?;
            let response = app.auth.login(&email, &password).await?;
            if let Some(message) = response.message {
                println!("{}", message);
            }

            let target = app.router.redirect_target().await.unwrap_or_else(|| "/".into());
            let nav = app.router.push(&target).await?;
            println!("Signed in; now at {} ({})", nav.location, nav.route.name);
        }
        Commands::Logout => {
            app.auth.logout().await?;
            println!("Signed out");
        }
        Commands::Whoami => {
            let session = app.session.snapshot().await;
            let authenticated = session.is_authenticated();
            match session.user {
                Some(user) if authenticated => {
                    println!("{} <{}> (id {})", user.name, user.email, user.id);
                    if let Some(expires_at) = session.expires_at {
                        println!("Session expires at {}", expires_at.to_rfc3339());
                    }
                }
                _ => println!("Not signed in"),
            }
        }
        Commands::Navigate { path } => {
            let nav = app.router.push(&path).await?;
            match nav.redirected_from {
                Some(from) => println!("{} -> {} ({})", from, nav.location, nav.route.name),
                None => println!("{} ({})", nav.location, nav.route.name),
            }
        }
        Commands::Employees(command) => {
            let nav = app.router.push("/employee").await?;
            if nav.route.name == RouteName::Login {
                anyhow::bail!("Not signed in; run `staffdesk login` first");
            }
            run_employees(app, command).await?;
        }
        Commands::Departments => {
            for department in app.departments.get_departments().await? {
                println!("{:>4}  {}", department.id, department.title);
            }
        }
        Commands::Positions => {
            for position in app.job_positions.get_job_positions().await? {
                println!("{:>4}  {}", position.id, position.title);
            }
        }
    }

    Ok(())
}

async fn run_employees(app: &App, command: EmployeeCommands) -> anyhow::Result<()> {
    match command {
        EmployeeCommands::List { page, limit, search } => {
            let result = app.employees.get_employees(page, limit, &search).await?;
            for employee in &result.list {
                print_employee(employee);
            }
            let meta = app.employees.meta().await;
            println!(
                "page {}/{} ({} employees)",
                page + 1,
                meta.total_page,
                meta.total
            );
        }
        EmployeeCommands::Add(args) => {
            let payload = employee_form(app, args).await?.into_payload(None)?;
            let response = app.employees.add_employee(&payload).await?;
            println!("{}", response.message.unwrap_or_else(|| "Employee added".into()));
        }
        EmployeeCommands::Update { id, employee } => {
            let payload = employee_form(app, employee).await?.into_payload(Some(id))?;
            let response = app.employees.update_employee(&payload).await?;
            println!("{}", response.message.unwrap_or_else(|| "Employee updated".into()));
        }
        EmployeeCommands::Delete { id } => {
            let response = app.employees.delete_employee(id).await?;
            println!("{}", response.message.unwrap_or_else(|| "Employee deleted".into()));
        }
    }

    Ok(())
}

/// Resolves department and position ids against the server's lists.
async fn employee_form(app: &App, args: EmployeeArgs) -> anyhow::Result<EmployeeForm> {
    let department = match args.department_id {
        Some(id) => Some(
            app.departments
                .get_departments()
                .await?
                .into_iter()
                .find(|d| d.id == id)
                .with_context(|| format!("Unknown department id {}", id))?,
        ),
        None => None,
    };
    let job_position = match args.job_position_id {
        Some(id) => Some(
            app.job_positions
                .get_job_positions()
                .await?
                .into_iter()
                .find(|p| p.id == id)
                .with_context(|| format!("Unknown job position id {}", id))?,
        ),
        None => None,
    };

    Ok(EmployeeForm {
        name: args.name,
        gender: args.gender,
        email: args.email,
        phone: args.phone,
        date_of_birth: Some(args.date_of_birth),
        address: args.address,
        department,
        job_position,
    })
}

fn print_employee(employee: &Employee) {
    println!(
        "{:>4}  {:<24} {:<28} {:<16} {:<16} {}",
        employee.id,
        employee.name,
        employee.email,
        employee.departement,
        employee.position,
        employee.status
    );
}
