use clap::{Args, Parser, Subcommand};
use fieldcheck_lib::config::{self, Config, ConfigError};
use fieldcheck_lib::{report, FormData, FormResult, RuleOptions, Validator};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

const EXIT_INVALID: i32 = 1;
const EXIT_CONFIG: i32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "fieldcheck",
    about = "Username, email and password validator",
    version,
    long_about = "Checks usernames, emails and passwords against configurable rules.\n\nExamples:\n  fieldcheck check email alice@example.com          # Check a single value\n  fieldcheck --strict check password 'abc!1234'     # Require a digit and a special character\n  fieldcheck register -u alice -e a@b.com -p secret # Check a registration form\n  fieldcheck --config rules.yml login --data form.json\n  fieldcheck --json login -e a@b.com                # Print the result as JSON"
)]
struct Fieldcheck {
    #[command(subcommand)]
    command: Commands,

    /// Run in verbose mode with detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run in debug mode with extensive details
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file (YAML, or JSON with a .json extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    rules: RuleArgs,
}

#[derive(Debug, Args)]
struct RuleArgs {
    /// Minimum username length
    #[arg(long, global = true, allow_negative_numbers = true)]
    username_min: Option<i64>,

    /// Minimum password length
    #[arg(long, global = true, allow_negative_numbers = true)]
    password_min: Option<i64>,

    /// Require a special character and a digit in passwords
    #[arg(long, global = true)]
    strict: bool,

    /// Only accept emails from this domain (repeatable)
    #[arg(long = "allow-domain", value_name = "DOMAIN", global = true)]
    allow_domains: Vec<String>,
}

impl RuleArgs {
    fn to_options(&self) -> RuleOptions {
        RuleOptions {
            username_min: self.username_min,
            password_min: self.password_min,
            strict_password: self.strict.then_some(true),
            allowed_email_domains: if self.allow_domains.is_empty() {
                None
            } else {
                Some(self.allow_domains.clone())
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check a single value
    Check {
        /// Field kind: username, email or password
        kind: String,

        /// Value to check (an omitted value is reported as missing)
        value: Option<String>,

        /// Name used in messages (defaults to the kind)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Check a registration form (username, email, password)
    Register {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        password: Option<String>,

        /// Read form values from a YAML or JSON file; flags take precedence
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Check a login form (email, password)
    Login {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        password: Option<String>,

        /// Read form values from a YAML or JSON file; flags take precedence
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Show the effective rules
    Rules,
}

fn load_form(
    data: &Option<PathBuf>,
    username: &Option<String>,
    email: &Option<String>,
    password: &Option<String>,
) -> Result<FormData, ConfigError> {
    let mut form: FormData = match data {
        Some(path) => config::read_document(path)?,
        None => FormData::default(),
    };

    if username.is_some() {
        form.username = username.clone();
    }
    if email.is_some() {
        form.email = email.clone();
    }
    if password.is_some() {
        form.password = password.clone();
    }

    Ok(form)
}

fn print_json<T: Serialize>(value: &T) {
    match report::to_json(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            logging::error(&format!("Failed to serialize result: {}", e));
            process::exit(EXIT_CONFIG);
        }
    }
}

fn finish_form(form: &str, result: &FormResult, json: bool) -> ! {
    if json {
        print_json(result);
    } else {
        println!("{}", report::format_form(form, result));
    }
    process::exit(if result.valid { 0 } else { EXIT_INVALID });
}

fn main() {
    let cli = Fieldcheck::parse();

    if cli.debug {
        logging::set_log_level(logging::LogLevel::Debug);
        logging::debug("Debug mode enabled - showing detailed logs");
    } else if cli.verbose {
        logging::set_log_level(logging::LogLevel::Info);
        logging::info("Verbose mode enabled");
    }

    let config = match &cli.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(EXIT_CONFIG);
        }),
        None => Config::default(),
    };

    // Command-line flags take precedence over the file's log level
    if !cli.debug && !cli.verbose {
        if let Some(level) = config.log_level {
            logging::set_log_level(level);
        }
    }

    let validator = config.validator(cli.rules.to_options());

    match &cli.command {
        Commands::Check { kind, value, name } => {
            let display_name = name.as_deref().unwrap_or(kind.as_str());
            let result = validator.check(value.as_deref(), kind, display_name);
            if cli.json {
                print_json(&result);
            } else {
                println!("{}", report::format_field(display_name, &result));
            }
            process::exit(if result.valid { 0 } else { EXIT_INVALID });
        }

        Commands::Register {
            username,
            email,
            password,
            data,
        } => {
            let form = load_form(data, username, email, password).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                process::exit(EXIT_CONFIG);
            });
            finish_form("register", &validator.register(&form), cli.json);
        }

        Commands::Login {
            email,
            password,
            data,
        } => {
            let form = load_form(data, &None, email, password).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                process::exit(EXIT_CONFIG);
            });
            finish_form("login", &validator.login(&form), cli.json);
        }

        Commands::Rules => show_rules(&validator, cli.json),
    }
}

fn show_rules(validator: &Validator, json: bool) {
    if json {
        print_json(validator.rules());
    } else {
        println!("{}", report::format_rules(validator.rules()));
    }
}
