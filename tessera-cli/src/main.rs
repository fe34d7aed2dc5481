use std::path::{Path, PathBuf};
use structopt::StructOpt;
use tessera_pipeline::{
    generate_entries, import_path, load_project_defaults, prebuild, GenerateScope, ImportFlags, ImportOptions,
    ImporterRegistry, PipelineResult, PrebuildOptions, TesseraProjectConfiguration,
};

#[derive(StructOpt, Debug)]
#[structopt(name = "tessera", about = "Imports assets and generates archetype sources")]
struct TesseraArgs {
    /// Project file to use instead of searching upward from the working directory
    #[structopt(name = "project", long, parse(from_os_str))]
    project: Option<PathBuf>,
    /// Regenerate archetypes even if the cache says they are unchanged
    #[structopt(name = "force", long)]
    force: bool,
    #[structopt(subcommand)]
    command: Option<Command>,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Import textures, import fonts, then generate archetypes
    Prebuild,
    /// Run one importer over an asset directory or file
    Import {
        /// textures or fonts
        importer: String,
        #[structopt(parse(from_os_str))]
        root: PathBuf,
        #[structopt(long)]
        recur: bool,
        #[structopt(long)]
        prune: bool,
        #[structopt(long)]
        default: bool,
        #[structopt(long)]
        clear: bool,
    },
    /// Generate the archetypes under the given directories or descriptor files
    Generate {
        #[structopt(parse(from_os_str), required = true)]
        paths: Vec<PathBuf>,
    },
}

fn absolute(
    working_dir: &Path,
    path: &Path,
) -> PathBuf {
    let joined = working_dir.join(path);
    dunce::canonicalize(&joined).unwrap_or(joined)
}

fn load_project(
    args: &TesseraArgs,
    working_dir: &Path,
) -> PipelineResult<TesseraProjectConfiguration> {
    match &args.project {
        Some(project_file) => TesseraProjectConfiguration::read_from_path(&absolute(working_dir, project_file)),
        None => TesseraProjectConfiguration::locate_or_default(working_dir),
    }
}

fn run_import(
    project: &TesseraProjectConfiguration,
    importer_name: &str,
    root: &Path,
    flags: ImportFlags,
) -> PipelineResult<()> {
    let registry = ImporterRegistry::with_builtin_importers();
    let importer = registry.importer(importer_name).ok_or_else(|| {
        format!(
            "Unknown importer {:?}, expected one of {:?}",
            importer_name,
            registry.importer_names()
        )
    })?;

    let project_defaults = load_project_defaults(&project.asset_defaults_path);
    let options = ImportOptions {
        sidecar_extension: &project.sidecar_extension,
        project_defaults: &project_defaults,
        flags,
    };

    let summary = import_path(importer, root, &options)?;
    println!(
        "{}: {} created, {} updated, {} unchanged, {} pruned, {} cleared",
        importer_name, summary.created, summary.updated, summary.unchanged, summary.pruned, summary.cleared
    );
    Ok(())
}

fn run(args: &TesseraArgs) -> PipelineResult<i32> {
    let working_dir = std::env::current_dir()?;
    let project = load_project(args, &working_dir)?;
    log::debug!("Project root is {:?}", project.root_path);

    match &args.command {
        None | Some(Command::Prebuild) => {
            let report = prebuild(&project, PrebuildOptions { force: args.force });
            for error in report.errors() {
                eprintln!("error: {}", error);
            }
            Ok(report.exit_code())
        }
        Some(Command::Import {
            importer,
            root,
            recur,
            prune,
            default,
            clear,
        }) => {
            let cli_flags = ImportFlags {
                recur: *recur,
                prune: *prune,
                default: *default,
                clear: *clear,
            };
            // Without any flag on the command line the project's import flags apply
            let flags = if cli_flags == ImportFlags::default() {
                project.import_flags
            } else {
                cli_flags
            };
            run_import(&project, importer, &absolute(&working_dir, root), flags)?;
            Ok(0)
        }
        Some(Command::Generate { paths }) => {
            let entries: Vec<String> = paths
                .iter()
                .map(|x| absolute(&working_dir, x).to_string_lossy().into_owned())
                .collect();
            let summary = generate_entries(&project, &entries, GenerateScope::Partial, args.force)?;
            for error in &summary.failures {
                eprintln!("error: {}", error);
            }
            println!(
                "{} archetypes generated, {} unchanged, {} failed",
                summary.generated,
                summary.clean,
                summary.failures.len()
            );
            Ok(if summary.failures.is_empty() { 0 } else { 1 })
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Auto)
        .init();

    let args = TesseraArgs::from_args();
    let exit_code = match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            log::error!("{}", e);
            1
        }
    };

    std::process::exit(exit_code);
}
