//! Command-line parsing

use anyhow::{bail, Context, Result};
use icon_forge::FilterType;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: icon-forge <INPUT> [options]
       icon-forge --inspect <FILE.ico|FILE.icns>

Options:
  --name <NAME>           Base name for output files (default: input file stem)
  --platforms <LIST>      Comma-separated: macOS,windows,linux (default: all)
  --out <DIR>             Output directory (default: .)
  --config <FILE>         Config file (default: ./icon-forge.toml if present)
  --filter <FILTER>       nearest | bilinear
  --retina                Also write ICNS @2x element types
  --bundle                Write {name}_all_icons.zip instead of separate files
  --loose                 Also write {name}_{platform}.zip of plain PNGs
  --json                  Print a JSON summary
  -h, --help              Show this help";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    pub input: Option<PathBuf>,
    pub name: Option<String>,
    pub platforms: Vec<String>,
    pub out_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub filter: Option<FilterType>,
    pub retina: bool,
    pub bundle: bool,
    pub loose: bool,
    pub json: bool,
    pub inspect: Option<PathBuf>,
    pub help: bool,
}

pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--name" => parsed.name = Some(value(&mut args, "--name")?),
            "--platforms" => {
                parsed.platforms = value(&mut args, "--platforms")?
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "--out" => parsed.out_dir = Some(PathBuf::from(value(&mut args, "--out")?)),
            "--config" => parsed.config = Some(PathBuf::from(value(&mut args, "--config")?)),
            "--filter" => {
                parsed.filter = Some(match value(&mut args, "--filter")?.as_str() {
                    "nearest" => FilterType::Nearest,
                    "bilinear" => FilterType::Bilinear,
                    other => bail!("unknown filter '{}' (expected nearest or bilinear)", other),
                });
            }
            "--retina" => parsed.retina = true,
            "--bundle" => parsed.bundle = true,
            "--loose" => parsed.loose = true,
            "--json" => parsed.json = true,
            "--inspect" => parsed.inspect = Some(PathBuf::from(value(&mut args, "--inspect")?)),
            "-h" | "--help" => parsed.help = true,
            flag if flag.starts_with('-') => bail!("unknown option '{}'", flag),
            _ => {
                if parsed.input.is_some() {
                    bail!("only one INPUT image may be given");
                }
                parsed.input = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(parsed)
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{} requires a value", flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_full() {
        let args = parse(&[
            "logo.png",
            "--name",
            "App",
            "--platforms",
            "macOS, windows",
            "--out",
            "dist",
            "--filter",
            "nearest",
            "--bundle",
            "--json",
        ])
        .unwrap();

        assert_eq!(args.input, Some(PathBuf::from("logo.png")));
        assert_eq!(args.name.as_deref(), Some("App"));
        assert_eq!(args.platforms, vec!["macOS", "windows"]);
        assert_eq!(args.out_dir, Some(PathBuf::from("dist")));
        assert_eq!(args.filter, Some(FilterType::Nearest));
        assert!(args.bundle && args.json);
        assert!(!args.loose);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--name"]).is_err());
        assert!(parse(&["--filter", "cubic"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["a.png", "b.png"]).is_err());
    }

    #[test]
    fn test_parse_inspect() {
        let args = parse(&["--inspect", "app.icns"]).unwrap();
        assert_eq!(args.inspect, Some(PathBuf::from("app.icns")));
        assert!(args.input.is_none());
    }
}
