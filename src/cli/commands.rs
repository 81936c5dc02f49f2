use clap::{Args, Parser, Subcommand};

const VERSION: &str = env!("HUBTASKS_VERSION");

#[derive(Parser)]
#[command(
    name = "hubtasks",
    version = VERSION,
    about = "Recurring housekeeping and maintenance tasks for hotel locations",
    after_help = "\
NOTE:
  Data is stored in the nearest .hubtasks/ directory (or $HUBTASKS_DIR).
  Run `hubtasks init` before any other command.
  Most commands act on one location: pass --location <id> or run `hubtasks location use <id>`.

EXIT CODES:
  0  Success
  1  Error (database, validation, missing configuration, invalid transition, etc.)

SCHEDULING:
  fixed    next instance = last scheduled date + interval, created by `hubtasks sweep`
  dynamic  next instance = completion date + interval, created on `instance complete`
  none     a single instance, created with the task
  Run `hubtasks sweep` hourly from cron. It moves pending → due on the due date,
  any non-complete state → overdue after it, then generates fixed instances.

ENVIRONMENT:
  HUBTASKS_DIR         data directory override
  HUBTASKS_LOG         log filter (default: hubtasks=warn)
  HUBTASKS_LOG_FORMAT  pretty | json (logs go to stderr)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Location (hotel) ID
    #[arg(long, global = true)]
    pub location: Option<i64>,

    /// Pin the current time (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, global = true)]
    pub now: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize hubtasks in this directory
    Init,

    /// Default location management
    #[command(subcommand)]
    Location(LocationCommands),

    /// Location configuration (departments, patterns, states, areas)
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Recurring patterns
    #[command(subcommand)]
    Pattern(PatternCommands),

    /// Task states
    #[command(subcommand)]
    State(StateCommands),

    /// Checklist templates
    #[command(subcommand)]
    Template(TemplateCommands),

    /// Task definitions
    #[command(subcommand)]
    Task(TaskCommands),

    /// Task instances
    #[command(subcommand)]
    Instance(InstanceCommands),

    /// Instance notes
    #[command(subcommand)]
    Note(NoteCommands),

    /// Advance instance states and generate fixed-pattern instances
    Sweep,

    /// Show location summary
    Status,
}

#[derive(Subcommand)]
pub enum LocationCommands {
    /// Set the default location
    Use {
        /// Location ID from the host application
        id: i64,
    },
    /// Show the default location
    Show,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Load location settings from stdin JSON
    #[command(after_help = "\
STDIN FORMAT:
  {\"departments\": [{\"name\":\"Housekeeping\", \"slug\":\"housekeeping\"}],
   \"recurring_patterns\": [{\"name\":\"Weekly\", \"interval_type\":\"fixed\", \"interval_days\":7}],
   \"task_states\": [{\"name\":\"Pending\", \"slug\":\"pending\", \"role\":\"pending\"}, ...],
   \"areas\": [{\"name\":\"Floor 1\"}, {\"name\":\"Room 101\", \"parent\":\"Floor 1\"}]}

NOTE:
  Atomic: all-or-nothing. Unknown fields are rejected.
  Rows missing from the document are disabled, never deleted.
  Without task_states, the default Pending/Due/Overdue/Complete set is seeded once.")]
    Load,
    /// Show location settings as JSON
    Show,
}

#[derive(Subcommand)]
pub enum PatternCommands {
    /// List recurring patterns
    List,
}

#[derive(Subcommand)]
pub enum StateCommands {
    /// List task states
    List,
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Create a template or replace its items
    Save {
        /// Template name
        name: String,
        /// Checklist item (repeatable, in order)
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        #[arg(long)]
        by: Option<String>,
    },
    /// List templates
    List,
    /// Show a template's items
    Show { name: String },
    /// Delete a template (tasks keep their checklists)
    Delete { name: String },
}

#[derive(Args)]
pub struct TaskFields {
    #[arg(long)]
    pub description: Option<String>,
    /// none | fixed | dynamic
    #[arg(long)]
    pub recurrence: Option<String>,
    /// Recurring pattern name
    #[arg(long)]
    pub pattern: Option<String>,
    /// Department slug
    #[arg(long)]
    pub department: Option<String>,
    /// Area name
    #[arg(long)]
    pub area: Option<String>,
    /// Checklist item (repeatable, in order)
    #[arg(long = "item")]
    pub items: Vec<String>,
    /// Copy the checklist from a template (conflicts with --item)
    #[arg(long, conflicts_with = "items")]
    pub template: Option<String>,
    /// Reference photo URL (repeatable)
    #[arg(long = "photo")]
    pub photos: Vec<String>,
    /// Text shown when completing
    #[arg(long)]
    pub reminder: Option<String>,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    #[command(after_help = "\
NOTE:
  --pattern is required for fixed and dynamic tasks and must have the same interval type.
  none/dynamic tasks get their first instance at --start (default today).
  fixed tasks get their first instance from the next sweep.")]
    Add {
        /// Task name
        name: String,
        #[command(flatten)]
        fields: TaskFields,
        /// Require a photo to complete
        #[arg(long)]
        require_photo: bool,
        /// Create the task inactive
        #[arg(long)]
        inactive: bool,
        /// First instance date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Author
        #[arg(long)]
        by: Option<String>,
    },
    /// List tasks
    List,
    /// Show task details
    Show {
        /// Task ID or prefix
        id: String,
    },
    /// Edit a task
    #[command(after_help = "\
NOTE:
  --item, --photo and --template replace the whole list when given; --clear-items empties the checklist.
  --update-future also resets checklist progress on future, non-completed instances.")]
    Edit {
        /// Task ID or prefix
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        #[arg(long)]
        clear_items: bool,
        #[arg(long)]
        require_photo: Option<bool>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        update_future: bool,
    },
    /// Delete a task with all its instances and notes
    Delete {
        /// Task ID or prefix
        id: String,
    },
    /// Bulk operations on future, non-completed instances
    #[command(subcommand)]
    Future(FutureCommands),
}

#[derive(Subcommand)]
pub enum FutureCommands {
    /// Count future instances
    Count { task: String },
    /// Reset checklist progress on future instances
    Update { task: String },
    /// Renumber future due dates from the last completion (or today)
    Reschedule {
        task: String,
        /// New interval in days
        #[arg(long)]
        interval: u32,
    },
    /// Delete future instances
    Clear { task: String },
}

#[derive(Subcommand)]
pub enum InstanceCommands {
    /// List the location board (today-90 .. today+30)
    List {
        /// Department slug (repeatable)
        #[arg(long)]
        department: Vec<String>,
        /// State slug (repeatable)
        #[arg(long)]
        status: Vec<String>,
        /// Area name or path fragment
        #[arg(long)]
        area: Option<String>,
        /// Search task name and description
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        show_completed: bool,
        /// Hide instances due after today
        #[arg(long)]
        no_future: bool,
    },
    /// Show instance details with checklist and notes
    Show {
        /// Instance ID or prefix
        id: String,
    },
    /// Tick a checklist item (0-based index)
    Check {
        id: String,
        index: usize,
        #[arg(long)]
        uncheck: bool,
    },
    /// Move an instance to a non-complete state
    Status {
        id: String,
        /// State slug
        state: String,
    },
    /// Complete an instance
    Complete {
        id: String,
        /// Who completed it
        #[arg(long)]
        by: Option<String>,
        /// Completion photo URL (repeatable)
        #[arg(long = "photo")]
        photos: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Add a note to an instance
    Add {
        /// Instance ID or prefix
        instance: String,
        text: String,
        /// Do not copy the note to the next instance
        #[arg(long)]
        no_carry: bool,
        #[arg(long = "photo")]
        photos: Vec<String>,
        #[arg(long)]
        by: Option<String>,
    },
    /// List notes of an instance
    List { instance: String },
}
