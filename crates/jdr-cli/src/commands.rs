use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use jdr_io::{CanvasGraphics, Format, IoConfig, JdrIo, LoadedImage, MessageLog, Registries};
use jdr_types::{CompleteObject, Feature, JdrVersion, ObjectBody};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

const DEFAULT_CONFIG: &str = "jdr.toml";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let io = JdrIo::new(config)?;
    match cli.command {
        Command::Convert(args) => cmd_convert(&io, args),
        Command::Info(args) => cmd_info(&io, args, &cli.format),
        Command::Dump(args) => cmd_dump(&io, args),
        Command::Check(args) => cmd_check(&io, args),
        Command::Versions => cmd_versions(&cli.format),
        Command::Paint(args) => cmd_paint(args, &cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<IoConfig> {
    if let Some(path) = path {
        return IoConfig::load(path).with_context(|| format!("reading {}", path.display()));
    }
    let default = Path::new(DEFAULT_CONFIG);
    if default.exists() {
        debug!(path = DEFAULT_CONFIG, "using configuration file");
        return IoConfig::load(default).with_context(|| format!("reading {DEFAULT_CONFIG}"));
    }
    Ok(IoConfig::default())
}

fn load(io: &JdrIo, path: &Path, canvas: &mut CanvasGraphics) -> anyhow::Result<LoadedImage> {
    io.load_file(path, canvas)
        .with_context(|| format!("loading {}", path.display()))
}

fn cmd_convert(io: &JdrIo, args: ConvertArgs) -> anyhow::Result<()> {
    let format = match args.to.or_else(|| Format::from_path(&args.output)) {
        Some(format) => format,
        None => anyhow::bail!(
            "cannot tell the output format of {}; use --to",
            args.output.display()
        ),
    };
    let mut canvas = CanvasGraphics::new();
    let loaded = load(io, &args.input, &mut canvas)?;

    let mut options = io.save_options(format);
    if let Some(version) = args.file_version {
        options = options.with_version(version);
    }
    if let Some(settings) = args.settings {
        options = options.with_settings(settings);
    }
    io.save_file(&args.output, &loaded.root, &mut canvas, options)
        .with_context(|| format!("saving {}", args.output.display()))?;
    println!(
        "{} {} ({} {}) → {} ({} {})",
        "✓".green().bold(),
        args.input.display(),
        Format::from_path(&args.input).map_or("?", Format::name),
        loaded.version,
        args.output.display().to_string().bold(),
        format,
        options.version.to_string().yellow(),
    );
    Ok(())
}

/// Per-kind object counts and the deepest group nesting below the root.
#[derive(Default)]
struct Stats {
    kinds: BTreeMap<String, usize>,
    depth: usize,
}

impl Stats {
    fn collect(root: &CompleteObject) -> Self {
        let mut stats = Self::default();
        if let ObjectBody::Group(group) = &root.body {
            for object in &group.objects {
                stats.visit(object, 1);
            }
        }
        stats
    }

    fn visit(&mut self, object: &CompleteObject, depth: usize) {
        self.depth = self.depth.max(depth);
        *self.kinds.entry(object.body.kind().to_string()).or_default() += 1;
        if let ObjectBody::Group(group) = &object.body {
            for child in &group.objects {
                self.visit(child, depth + 1);
            }
        }
    }
}

fn cmd_info(io: &JdrIo, args: InfoArgs, output: &OutputFormat) -> anyhow::Result<()> {
    let log = MessageLog::new();
    let mut canvas = CanvasGraphics::with_messages(log.clone());
    let loaded = load(io, &args.file, &mut canvas)?;
    let stats = Stats::collect(&loaded.root);
    let settings = &canvas.settings;

    match output {
        OutputFormat::Json => {
            let info = json!({
                "file": args.file.display().to_string(),
                "version": loaded.version,
                "settings": loaded.settings_flag,
                "storage_unit": settings.storage_unit.name(),
                "objects": loaded.object_count(),
                "depth": stats.depth,
                "kinds": stats.kinds,
                "warnings": log.warnings(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Text => {
            println!("{}", args.file.display().to_string().bold());
            println!("  Version: {}", loaded.version.to_string().yellow());
            println!("  Settings: {}", loaded.settings_flag);
            println!("  Storage unit: {}", settings.storage_unit.name());
            println!(
                "  Objects: {} (nesting depth {})",
                loaded.object_count().to_string().bold(),
                stats.depth
            );
            for (kind, count) in &stats.kinds {
                println!("    {kind}: {count}");
            }
            for warning in log.warnings() {
                println!("  {} {}", "warning:".yellow(), warning);
            }
        }
    }
    Ok(())
}

fn cmd_dump(io: &JdrIo, args: DumpArgs) -> anyhow::Result<()> {
    let mut canvas = CanvasGraphics::new();
    let loaded = load(io, &args.file, &mut canvas)?;
    let value = if args.settings {
        json!({ "settings": canvas.settings, "root": loaded.root })
    } else {
        serde_json::to_value(&loaded.root)?
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_check(io: &JdrIo, args: CheckArgs) -> anyhow::Result<()> {
    let mut failures = 0;
    for file in &args.files {
        let log = MessageLog::new();
        let mut canvas = CanvasGraphics::with_messages(log.clone());
        match io.load_file(file, &mut canvas) {
            Ok(loaded) => {
                let warnings = log.warnings();
                let mark = if warnings.is_empty() { "✓".green() } else { "!".yellow() };
                println!(
                    "{} {} ({}, {} objects)",
                    mark.bold(),
                    file.display(),
                    loaded.version,
                    loaded.object_count()
                );
                for warning in warnings {
                    println!("  {} {}", "warning:".yellow(), warning);
                }
            }
            Err(err) => {
                failures += 1;
                println!("{} {}", "✗".red().bold(), file.display());
                println!("  {} {}", "error:".red(), err);
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} of {} files failed to load", args.files.len());
    }
    Ok(())
}

fn cmd_versions(output: &OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => {
            let versions: Vec<_> = JdrVersion::ALL
                .iter()
                .map(|&v| {
                    let features: Vec<_> =
                        Feature::introduced_in(v).map(Feature::description).collect();
                    json!({ "version": v, "features": features })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&versions)?);
        }
        OutputFormat::Text => {
            for version in JdrVersion::ALL {
                let latest = if version == JdrVersion::LATEST { " (latest)" } else { "" };
                println!("{}{}", version.to_string().yellow().bold(), latest.dimmed());
                for feature in Feature::introduced_in(version) {
                    println!("  {}", feature.description());
                }
            }
        }
    }
    Ok(())
}

fn cmd_paint(args: PaintArgs, output: &OutputFormat) -> anyhow::Result<()> {
    let registries = Registries::standard();
    let paints = &registries.paints;
    let paint = paints.parse_config_str(&args.config)?;
    let canonical = paints.config_string(&paint)?;
    match output {
        OutputFormat::Json => {
            let value = json!({
                "kind": paint.kind().to_string(),
                "config": canonical,
                "paint": paint,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{} {}", paint.kind().to_string().bold(), canonical.cyan());
        }
    }
    Ok(())
}
