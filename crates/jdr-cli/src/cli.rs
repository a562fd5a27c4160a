use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jdr_io::Format;
use jdr_types::{JdrVersion, SettingsFlag};

#[derive(Parser)]
#[command(
    name = "jdr",
    about = "Convert and inspect JDR and AJR drawings",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// IO configuration file (defaults to ./jdr.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a drawing to another format or version
    Convert(ConvertArgs),
    /// Show a drawing's version, settings and object statistics
    Info(InfoArgs),
    /// Print the object tree as JSON
    Dump(DumpArgs),
    /// Load a drawing and report warnings or the first error
    Check(CheckArgs),
    /// List the file format versions and what each introduced
    Versions,
    /// Parse a paint configuration string
    Paint(PaintArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Output format (guessed from the output extension when omitted)
    #[arg(long)]
    pub to: Option<Format>,
    /// Output version
    #[arg(long)]
    pub file_version: Option<JdrVersion>,
    /// Settings to save: none, all or paper
    #[arg(long)]
    pub settings: Option<SettingsFlag>,
}

#[derive(Args)]
pub struct InfoArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct DumpArgs {
    pub file: PathBuf,
    /// Include the canvas settings
    #[arg(long)]
    pub settings: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct PaintArgs {
    #[arg(id = "paint_config", value_name = "CONFIG")]
    pub config: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_convert() {
        let cli = Cli::try_parse_from([
            "jdr", "convert", "in.jdr", "out.ajr", "--to", "ajr", "--file-version", "1.8",
            "--settings", "paper",
        ])
        .unwrap();
        if let Command::Convert(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("in.jdr"));
            assert_eq!(args.output, PathBuf::from("out.ajr"));
            assert_eq!(args.to, Some(Format::Ajr));
            assert_eq!(args.file_version, Some(JdrVersion::V1_8));
            assert_eq!(args.settings, Some(SettingsFlag::PaperOnly));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_convert_defaults() {
        let cli = Cli::try_parse_from(["jdr", "convert", "a.ajr", "b.jdr"]).unwrap();
        if let Command::Convert(args) = cli.command {
            assert!(args.to.is_none());
            assert!(args.file_version.is_none());
            assert!(args.settings.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn reject_unknown_version() {
        assert!(Cli::try_parse_from(["jdr", "convert", "a", "b", "--file-version", "3.0"]).is_err());
    }

    #[test]
    fn parse_info_json() {
        let cli = Cli::try_parse_from(["jdr", "--format", "json", "info", "x.jdr"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(cli.command, Command::Info(_)));
    }

    #[test]
    fn parse_check_many() {
        let cli = Cli::try_parse_from(["jdr", "check", "a.jdr", "b.ajr"]).unwrap();
        if let Command::Check(args) = cli.command {
            assert_eq!(args.files.len(), 2);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_paint() {
        let cli = Cli::try_parse_from(["jdr", "paint", "1,0,0,0,1"]).unwrap();
        if let Command::Paint(args) = cli.command {
            assert_eq!(args.config, "1,0,0,0,1");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_config_and_verbose() {
        let cli = Cli::try_parse_from(["jdr", "versions", "--config", "io.toml", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("io.toml")));
        assert!(matches!(cli.command, Command::Versions));
    }
}
