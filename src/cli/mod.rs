//! OCT-008: CLI subcommands: init, validate, vars, playbook, ping, completions.

pub mod options;

use crate::core::config;
use crate::core::playbook::{self, Invocation};
use crate::core::settings::AnsibleSettings;
use crate::core::variables::ExtraVars;
use crate::logging;
use crate::transport::local;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use options::{OutputOptions, VariableArgs};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "oct",
    version,
    about = "Origin CI tool: Ansible playbooks with defaulted extra variables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for `oct vars`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an oct.yaml with the default variables
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate oct.yaml without running anything
    Validate {
        /// Path to oct.yaml
        #[arg(short, long, default_value = "oct.yaml")]
        file: PathBuf,
    },

    /// Print the fully-defaulted extra variables
    Vars {
        #[command(flatten)]
        vars: VariableArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Run an Ansible playbook with the defaulted extra variables
    Playbook {
        /// Playbook to run
        playbook: PathBuf,

        #[command(flatten)]
        vars: VariableArgs,

        #[command(flatten)]
        output: OutputOptions,

        /// Print the ansible-playbook command instead of running it
        #[arg(long)]
        print: bool,
    },

    /// Ping the target host group with Ansible
    Ping {
        #[command(flatten)]
        vars: VariableArgs,

        #[command(flatten)]
        output: OutputOptions,

        /// Print the ansible command instead of running it
        #[arg(long)]
        print: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Commands {
    /// Ansible settings for this command; defaults unless it carries output flags.
    pub fn settings(&self) -> AnsibleSettings {
        match self {
            Commands::Playbook { output, .. } | Commands::Ping { output, .. } => output.into(),
            _ => AnsibleSettings::default(),
        }
    }
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    let settings = cmd.settings();
    logging::init_logging(&settings);

    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Vars { vars, format } => cmd_vars(&vars, format),
        Commands::Playbook {
            playbook: path,
            vars,
            output: _,
            print,
        } => {
            let ctx = vars.build_context(settings)?;
            let invocation = playbook::build_playbook(&ctx, &path)?;
            run_invocation(&invocation, print)
        }
        Commands::Ping {
            vars,
            output: _,
            print,
        } => {
            let ctx = vars.build_context(settings)?;
            let invocation = playbook::build_ping(&ctx)?;
            run_invocation(&invocation, print)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "oct", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn cmd_init(path: &Path) -> Result<(), String> {
    let config_path = path.join("oct.yaml");
    if config_path.exists() {
        return Err(format!("{} already exists", config_path.display()));
    }

    std::fs::create_dir_all(path)
        .map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    std::fs::write(&config_path, config::default_template())
        .map_err(|e| format!("cannot write {}: {}", config_path.display(), e))?;

    println!("Initialized oct project at {}", path.display());
    println!("  Created: {}", config_path.display());
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let config = config::parse_config_file(file)?;
    let errors = config::validate_config(&config);

    if errors.is_empty() {
        println!(
            "OK: {} ({} variable overrides, {} playbook variables)",
            file.display(),
            config.variables.len(),
            config.playbook_variables.len()
        );
        Ok(())
    } else {
        for e in &errors {
            eprintln!("  ERROR: {}", e);
        }
        Err(format!("{} validation error(s)", errors.len()))
    }
}

fn cmd_vars(vars: &VariableArgs, format: Format) -> Result<(), String> {
    let ctx = vars.build_context(AnsibleSettings::default())?;
    println!("{}", render_vars(&ctx.extra_vars(), format)?);
    Ok(())
}

/// Render the extra variables for display.
fn render_vars(vars: &ExtraVars, format: Format) -> Result<String, String> {
    match format {
        Format::Json => serde_json::to_string_pretty(vars)
            .map_err(|e| format!("cannot encode JSON: {}", e)),
        Format::Yaml => serde_yaml_ng::to_string(vars)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| format!("cannot encode YAML: {}", e)),
    }
}

/// Print or execute an Ansible invocation.
fn run_invocation(invocation: &Invocation, print_only: bool) -> Result<(), String> {
    if print_only {
        println!("{}", invocation);
        return Ok(());
    }

    tracing::info!(command = %invocation, "running");
    let exit_code = local::exec_local_streaming(invocation)?;

    if exit_code == 0 {
        Ok(())
    } else {
        Err(format!("{} exited with status {}", invocation.program, exit_code))
    }
}
