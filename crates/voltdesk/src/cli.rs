//! Clap derive structures for the `voltdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Compiled into `build.rs` as well, so this file only depends on clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// voltdesk -- admin console for energy management backends
#[derive(Debug, Parser)]
#[command(
    name = "voltdesk",
    version,
    about = "Administer an energy management backend from the command line",
    long_about = "Manage devices, meters, permissions, roles and users of an\n\
        energy management backend. Log in once per profile; the session token\n\
        is persisted and reused by later invocations.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "VOLTDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, short = 's', env = "VOLTDESK_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VOLTDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VOLTDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "VOLTDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and persist the session for this profile
    Login(LoginArgs),

    /// Forget the persisted session for this profile
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage field devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage metering points
    #[command(alias = "m")]
    Meters(MetersArgs),

    /// Manage permissions (powers)
    #[command(alias = "perms")]
    Powers(PowersArgs),

    /// Manage roles and their permissions
    Roles(RolesArgs),

    /// Manage console users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// View menu entries
    Menus(MenusArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive substring filter over the searchable columns
    #[arg(long, short = 'S')]
    pub search: Option<String>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "VOLTDESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DeviceStatusArg {
    Online,
    Offline,
    Maintenance,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one device
    Get {
        /// Device ID
        id: i64,
    },

    /// Register a device
    Create {
        /// Serial number
        #[arg(long, required_unless_present = "from_file")]
        sn: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        status: Option<DeviceStatusArg>,

        /// Read the request body from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ["sn", "name", "model", "location", "status"])]
        from_file: Option<PathBuf>,
    },

    /// Update a device
    Update {
        /// Device ID
        id: i64,

        /// Serial number
        #[arg(long, required_unless_present = "from_file")]
        sn: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        status: Option<DeviceStatusArg>,

        /// Read the request body from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ["sn", "name", "model", "location", "status"])]
        from_file: Option<PathBuf>,
    },

    /// Delete a device
    #[command(alias = "rm")]
    Delete {
        /// Device ID
        id: i64,
    },
}

// ── Meters ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MetersArgs {
    #[command(subcommand)]
    pub command: MetersCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MeterKindArg {
    Electricity,
    Water,
    Gas,
    Heat,
}

#[derive(Debug, Subcommand)]
pub enum MetersCommand {
    /// List meters with the device they are attached to
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one meter
    Get {
        /// Meter ID
        id: i64,
    },

    /// Register a meter
    Create {
        /// Meter number
        #[arg(long, required_unless_present = "from_file")]
        meter_no: Option<String>,

        #[arg(long)]
        name: Option<String>,

        /// ID of the reading device
        #[arg(long)]
        device: Option<i64>,

        #[arg(long)]
        kind: Option<MeterKindArg>,

        /// Unit of measure (e.g. kWh)
        #[arg(long)]
        unit: Option<String>,

        /// Read the request body from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ["meter_no", "name", "device", "kind", "unit"])]
        from_file: Option<PathBuf>,
    },

    /// Update a meter
    Update {
        /// Meter ID
        id: i64,

        /// Meter number
        #[arg(long, required_unless_present = "from_file")]
        meter_no: Option<String>,

        #[arg(long)]
        name: Option<String>,

        /// ID of the reading device
        #[arg(long)]
        device: Option<i64>,

        #[arg(long)]
        kind: Option<MeterKindArg>,

        #[arg(long)]
        unit: Option<String>,

        /// Read the request body from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ["meter_no", "name", "device", "kind", "unit"])]
        from_file: Option<PathBuf>,
    },

    /// Delete a meter
    #[command(alias = "rm")]
    Delete {
        /// Meter ID
        id: i64,
    },
}

// ── Powers ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PowersArgs {
    #[command(subcommand)]
    pub command: PowersCommand,
}

#[derive(Debug, Subcommand)]
pub enum PowersCommand {
    /// List permissions
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Group by the menu each permission guards
        #[arg(long, short = 'g')]
        grouped: bool,
    },

    /// Show one permission
    Get {
        /// Power ID
        id: i64,
    },

    /// Create a permission
    Create {
        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,

        /// Permission code (e.g. device:write)
        #[arg(long, required_unless_present = "from_file")]
        code: Option<String>,

        /// ID of the guarded menu
        #[arg(long)]
        menu: Option<i64>,

        #[arg(long)]
        description: Option<String>,

        /// Read the request body from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ["name", "code", "menu", "description"])]
        from_file: Option<PathBuf>,
    },

    /// Update a permission
    Update {
        /// Power ID
        id: i64,

        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,

        #[arg(long, required_unless_present = "from_file")]
        code: Option<String>,

        #[arg(long)]
        menu: Option<i64>,

        #[arg(long)]
        description: Option<String>,

        /// Read the request body from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ["name", "code", "menu", "description"])]
        from_file: Option<PathBuf>,
    },

    /// Delete a permission
    #[command(alias = "rm")]
    Delete {
        /// Power ID
        id: i64,
    },
}

// ── Roles ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RolesCommand {
    /// List roles
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one role
    Get {
        /// Role ID
        id: i64,
    },

    /// Create a role
    Create {
        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Read the request body from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ["name", "description"])]
        from_file: Option<PathBuf>,
    },

    /// Update a role
    Update {
        /// Role ID
        id: i64,

        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Read the request body from a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ["name", "description"])]
        from_file: Option<PathBuf>,
    },

    /// Delete a role
    #[command(alias = "rm")]
    Delete {
        /// Role ID
        id: i64,
    },

    /// Show every permission and whether the role holds it
    Powers {
        /// Role ID
        id: i64,
    },

    /// Replace the role's permission set
    Assign {
        /// Role ID
        id: i64,

        /// Power IDs to grant (repeatable or comma-separated)
        #[arg(
            long = "power",
            short = 'P',
            value_delimiter = ',',
            required_unless_present = "clear"
        )]
        powers: Vec<i64>,

        /// Revoke every permission
        #[arg(long, conflicts_with = "powers")]
        clear: bool,
    },
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users with their role
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one user
    Get {
        /// User ID
        id: i64,
    },

    /// Create a user
    Create {
        #[arg(long, required_unless_present = "from_file")]
        username: Option<String>,

        #[arg(long)]
        display_name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Role ID
        #[arg(long)]
        role: Option<i64>,

        /// Create the account disabled
        #[arg(long)]
        disabled: bool,

        /// Prompt for an initial password
        #[arg(long)]
        with_password: bool,

        /// Read the request body from a JSON file
        #[arg(
            long,
            short = 'F',
            conflicts_with_all = ["username", "display_name", "email", "role", "disabled", "with_password"]
        )]
        from_file: Option<PathBuf>,
    },

    /// Update a user
    Update {
        /// User ID
        id: i64,

        #[arg(long, required_unless_present = "from_file")]
        username: Option<String>,

        #[arg(long)]
        display_name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Role ID
        #[arg(long)]
        role: Option<i64>,

        /// Enable or disable the account
        #[arg(long)]
        enabled: Option<bool>,

        /// Prompt for a new password
        #[arg(long)]
        with_password: bool,

        /// Read the request body from a JSON file
        #[arg(
            long,
            short = 'F',
            conflicts_with_all = ["username", "display_name", "email", "role", "enabled", "with_password"]
        )]
        from_file: Option<PathBuf>,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User ID
        id: i64,
    },
}

// ── Menus ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MenusArgs {
    #[command(subcommand)]
    pub command: MenusCommand,
}

#[derive(Debug, Subcommand)]
pub enum MenusCommand {
    /// List menu entries
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one menu entry
    Get {
        /// Menu ID
        id: i64,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
