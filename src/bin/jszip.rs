//! jszip CLI - unpack and package JavaScript zip bundles
//!
//! Usage:
//!   jszip unpack                   Extract runtime jszip dependencies
//!   jszip package                  Build <final_name>[-<classifier>].zip
//!   jszip deps                     Show which dependencies unpack selects

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jszip::{manifest, output, package, unpack};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jszip")]
#[command(about = "Unpack and package JavaScript zip bundles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the project manifest
    #[arg(
        short = 'f',
        long,
        global = true,
        env = "JSZIP_MANIFEST",
        default_value = manifest::MANIFEST_NAME
    )]
    manifest: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract direct runtime jszip dependencies into the staging directory
    Unpack {
        /// Directory to extract into
        #[arg(long)]
        target_dir: Option<PathBuf>,

        /// Comma-separated glob patterns of entries to extract
        #[arg(long)]
        includes: Option<String>,

        /// Comma-separated glob patterns of entries to skip
        #[arg(long)]
        excludes: Option<String>,

        /// Also unpack dependencies pulled in transitively
        #[arg(long)]
        include_transitive: bool,
    },

    /// Zip the content directory with descriptor metadata
    Package {
        /// Directory whose tree is zipped
        #[arg(long)]
        content_dir: Option<PathBuf>,

        /// Directory the zip is written to
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Base name of the zip
        #[arg(long, env = "JSZIP_FINAL_NAME")]
        final_name: Option<String>,

        /// Classifier appended to the name; the zip is then attached
        #[arg(long)]
        classifier: Option<String>,

        /// Keep directories that contain no files
        #[arg(long, env = "JSZIP_INCLUDE_EMPTY_DIRS")]
        include_empty_dirs: bool,

        /// Rewrite the zip even if it is up to date
        #[arg(long, env = "JSZIP_FORCE_CREATION")]
        force: bool,

        /// Leave out META-INF/maven/<group>/<artifact>/pom.{xml,properties}
        #[arg(long)]
        no_maven_descriptor: bool,
    },

    /// Show dependencies and whether unpack selects them
    Deps,
}

fn main() {
    if let Err(err) = run() {
        output::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let (manifest, mut project) = manifest::load(&cli.manifest)?;

    match cli.command {
        Commands::Unpack {
            target_dir,
            includes,
            excludes,
            include_transitive,
        } => {
            let mut config = manifest.unpack_config(&project);
            if let Some(dir) = target_dir {
                config.target_directory = dir;
            }
            if includes.is_some() {
                config.includes = includes;
            }
            if excludes.is_some() {
                config.excludes = excludes;
            }
            if include_transitive {
                config.exclude_transitive = false;
            }

            output::action(&format!(
                "Unpacking {} dependencies into {}",
                config.packaging_type,
                config.target_directory.display()
            ));
            let report = unpack::unpack(&project, &config).with_context(|| {
                format!("Failed to unpack dependencies of {}", project.artifact_id)
            })?;
            output::success(&format!(
                "unpacked {} artifact(s), {} entries",
                report.artifacts.len(),
                report.extracted
            ));
        }

        Commands::Package {
            content_dir,
            output_dir,
            final_name,
            classifier,
            include_empty_dirs,
            force,
            no_maven_descriptor,
        } => {
            let mut config = manifest.package_config(&project);
            if let Some(dir) = content_dir {
                config.content_directory = dir;
            }
            if let Some(dir) = output_dir {
                config.output_directory = dir;
            }
            if let Some(name) = final_name {
                config.final_name = name;
            }
            if classifier.is_some() {
                config.classifier = classifier;
            }
            config.include_empty_dirs |= include_empty_dirs;
            config.force_creation |= force;
            if no_maven_descriptor {
                config.add_maven_descriptor = false;
            }

            let report = package::package(&mut project, &config)
                .with_context(|| format!("Failed to package {}", project.artifact_id))?;
            match &report.classifier {
                Some(classifier) => output::info(&format!(
                    "attached {} ({})",
                    report.file.display(),
                    classifier
                )),
                None => output::info(&format!(
                    "{} -> {}",
                    project.artifact.coordinates,
                    report.file.display()
                )),
            }
        }

        Commands::Deps => {
            let config = manifest.unpack_config(&project);
            let selected = unpack::select_artifacts(&project, &config)?;

            if project.artifacts().is_empty() {
                output::info("No dependencies declared");
                return Ok(());
            }

            output::info(&format!(
                "{} of {} dependencies selected for unpack",
                selected.len(),
                project.artifacts().len()
            ));
            for artifact in project.artifacts() {
                let is_selected = selected.iter().any(|s| *s == artifact);
                let file = artifact
                    .file
                    .as_ref()
                    .map(|f| f.display().to_string())
                    .unwrap_or_else(|| "(unresolved)".to_string());
                output::list_item(&artifact.to_string(), &file, is_selected);
            }
        }
    }

    Ok(())
}
