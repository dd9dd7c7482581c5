//! Command-line front end for the gradebook records service.
//!
//! # Responsibility
//! - Drive `gradebook_core` collections, forms and field editors from a
//!   terminal.
//! - Keep output plain and tab-separated for piping.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use gradebook_core::model::resource::display_field;
use gradebook_core::{
    init_logging_from_config, ApiClient, Assignment, ClientConfig, Completion, CreationForm,
    EditableCollection, EnvTokenProvider, Operation, OperationError, RecordId, Resource, Student,
    Subject,
};
use log::warn;
use std::io::{BufRead, Write};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(version, about = "Track students, subjects and assignments", long_about = None)]
struct Cli {
    /// API base URL (overrides GRADEBOOK_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Environment variable holding the bearer token
    #[arg(long, default_value = EnvTokenProvider::DEFAULT_VAR)]
    token_env: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that the core library is linked
    Ping,
    /// Print the core library version
    Version,
    /// Manage students
    #[command(subcommand)]
    Students(StudentCommand),
    /// Manage subjects
    #[command(subcommand)]
    Subjects(SubjectCommand),
    /// Manage assignments
    #[command(subcommand)]
    Assignments(AssignmentCommand),
}

#[derive(Subcommand, Debug)]
enum StudentCommand {
    #[command(alias = "ls")]
    List,
    /// Show one student
    Show { id: RecordId },
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: String,
    },
    /// Set one field; an empty value clears optional fields
    Set {
        id: RecordId,
        field: String,
        value: String,
    },
    Delete {
        id: RecordId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SubjectCommand {
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        student: RecordId,
    },
    Add {
        #[arg(long)]
        student: RecordId,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        course_description: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Set {
        id: RecordId,
        field: String,
        value: String,
    },
    Delete {
        id: RecordId,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum AssignmentCommand {
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        subject: RecordId,
    },
    Add {
        #[arg(long)]
        student: RecordId,
        #[arg(long)]
        subject: RecordId,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, default_value = "")]
        date_completed: String,
        #[arg(long, default_value = "")]
        grade: String,
    },
    Set {
        id: RecordId,
        field: String,
        value: String,
    },
    Delete {
        id: RecordId,
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ping => {
            println!("gradebook_core ping={}", gradebook_core::ping());
            return Ok(());
        }
        Commands::Version => {
            println!("gradebook_core version={}", gradebook_core::core_version());
            return Ok(());
        }
        _ => {}
    }

    let mut config = ClientConfig::from_env().context("invalid environment configuration")?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_base_url(url).context("invalid --api-url")?;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let tokens = Arc::new(EnvTokenProvider::new(cli.token_env));
    let client =
        ApiClient::from_config(&config, tokens).map_err(|err| anyhow!("client setup: {err}"))?;

    match cli.command {
        Commands::Students(command) => run_students(client, command),
        Commands::Subjects(command) => run_subjects(client, command),
        Commands::Assignments(command) => run_assignments(client, command),
        Commands::Ping | Commands::Version => Ok(()),
    }
}

fn run_students(client: ApiClient, command: StudentCommand) -> Result<()> {
    match command {
        StudentCommand::List => list::<Student>(client, None),
        StudentCommand::Show { id } => {
            let student: Student = client.fetch_one(id).map_err(|err| {
                surface(OperationError::new(Operation::Load, Student::spec().label, err))
            })?;
            print_header::<Student>();
            print_row(&student);
            Ok(())
        }
        StudentCommand::Add {
            first_name,
            last_name,
            birth_date,
        } => add::<Student>(
            client,
            &[],
            &[
                ("first_name", first_name),
                ("last_name", last_name),
                ("birth_date", birth_date),
            ],
        ),
        StudentCommand::Set { id, field, value } => set::<Student>(client, id, &field, &value),
        StudentCommand::Delete { id, yes } => delete::<Student>(client, id, yes),
    }
}

fn run_subjects(client: ApiClient, command: SubjectCommand) -> Result<()> {
    match command {
        SubjectCommand::List { student } => list::<Subject>(client, Some(student)),
        SubjectCommand::Add {
            student,
            name,
            course_description,
            notes,
        } => add::<Subject>(
            client,
            &[("student", student)],
            &[
                ("name", name),
                ("course_description", course_description),
                ("notes", notes),
            ],
        ),
        SubjectCommand::Set { id, field, value } => set::<Subject>(client, id, &field, &value),
        SubjectCommand::Delete { id, yes } => delete::<Subject>(client, id, yes),
    }
}

fn run_assignments(client: ApiClient, command: AssignmentCommand) -> Result<()> {
    match command {
        AssignmentCommand::List { subject } => list::<Assignment>(client, Some(subject)),
        AssignmentCommand::Add {
            student,
            subject,
            name,
            notes,
            date_completed,
            grade,
        } => add::<Assignment>(
            client,
            &[("student", student), ("subject", subject)],
            &[
                ("name", name),
                ("notes", notes),
                ("date_completed", date_completed),
                ("grade", grade),
            ],
        ),
        AssignmentCommand::Set { id, field, value } => {
            set::<Assignment>(client, id, &field, &value)
        }
        AssignmentCommand::Delete { id, yes } => delete::<Assignment>(client, id, yes),
    }
}

fn list<R: Resource>(client: ApiClient, parent: Option<RecordId>) -> Result<()> {
    let collection = loaded::<R>(client, parent)?;
    print_header::<R>();
    for record in collection.rows() {
        print_row(record);
    }
    Ok(())
}

fn add<R: Resource>(
    client: ApiClient,
    parents: &[(&'static str, RecordId)],
    values: &[(&str, String)],
) -> Result<()> {
    let mut collection = match parents.last() {
        Some((_, id)) => EditableCollection::<R>::for_parent(client.clone(), *id),
        None => EditableCollection::<R>::new(client.clone()),
    };
    let mut form = CreationForm::<R>::new(client);
    for (key, id) in parents {
        form = form.with_parent(*key, *id);
    }
    for (field, value) in values {
        if !form.set(field, value.as_str()) {
            bail!("unknown field `{field}`");
        }
    }

    match form.submit(&mut collection).map_err(surface)? {
        Completion::Applied => {
            let created = form
                .created()
                .ok_or_else(|| anyhow!("server did not return the created {}", R::spec().label))?;
            println!(
                "created {} {}: {}",
                R::spec().label,
                created.id(),
                created.display_label()
            );
        }
        other => warn!("event=cli_create module=cli status={other:?}"),
    }
    Ok(())
}

fn set<R: Resource>(client: ApiClient, id: RecordId, field: &str, value: &str) -> Result<()> {
    let mut collection = loaded::<R>(client, None)?;
    let mut editor = collection
        .editor(id, field)
        .ok_or_else(|| anyhow!("no {} {id} with field `{field}`", R::spec().label))?;

    editor.activate();
    editor.input(value);
    match collection.save_from_editor(id, &mut editor) {
        Some(Ok(_)) => {
            println!("{}\t{}", editor.field().key, editor.display_text());
            Ok(())
        }
        Some(Err(err)) => Err(surface(err)),
        None => bail!("editor was not in editing state"),
    }
}

fn delete<R: Resource>(client: ApiClient, id: RecordId, yes: bool) -> Result<()> {
    let mut collection = loaded::<R>(client, None)?;
    let label = collection
        .get(id)
        .map(Resource::display_label)
        .ok_or_else(|| anyhow!("no {} {id}", R::spec().label))?;
    let outcome = if yes {
        collection.delete_record(id, &mut |_: &str| true)
    } else {
        collection.delete_record(id, &mut ask_yes_no)
    }
    .map_err(surface)?;

    match outcome {
        Completion::Applied => println!("deleted {} {id}: {label}", R::spec().label),
        Completion::Declined => println!("cancelled"),
        Completion::Stale | Completion::Detached => {
            warn!("event=cli_delete module=cli status={outcome:?} id={id}")
        }
    }
    Ok(())
}

fn loaded<R: Resource>(
    client: ApiClient,
    parent: Option<RecordId>,
) -> Result<EditableCollection<R>> {
    let mut collection = match parent {
        Some(parent) => EditableCollection::<R>::for_parent(client, parent),
        None => EditableCollection::<R>::new(client),
    };
    collection.load().map_err(surface)?;
    Ok(collection)
}

fn print_header<R: Resource>() {
    let names: Vec<&str> = R::spec().fields.iter().map(|field| field.name).collect();
    println!("ID\t{}", names.join("\t"));
}

fn print_row<R: Resource>(record: &R) {
    let cells: Vec<String> = R::spec()
        .fields
        .iter()
        .map(|field| display_field(record, field.key).unwrap_or_default())
        .collect();
    println!("{}\t{}", record.id(), cells.join("\t"));
}

fn ask_yes_no(message: &str) -> bool {
    print!("{message} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Converts an operation failure into the user-facing message.
fn surface(err: OperationError) -> anyhow::Error {
    warn!("event=cli_operation module=cli status=error error={err}");
    anyhow!(err.user_message())
}
