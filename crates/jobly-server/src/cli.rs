use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "jobly.toml";

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Serve(ServeArgs),
    Migrate(MigrateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Serve,
    Migrate,
}

/// Where configuration comes from, shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigArgs {
    pub config: PathBuf,
    /// `--config` was given, so a missing file is an error.
    pub explicit: bool,
    pub database: Option<String>,
}

impl Default for ConfigArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG),
            explicit: false,
            database: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServeArgs {
    pub config: ConfigArgs,
    pub bind: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MigrateArgs {
    pub config: ConfigArgs,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "serve" => parse_serve(it.map(|s| s.as_str())),
        "migrate" => parse_migrate(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Consume a `--config` / `--database` option if `token` is one.
fn parse_config_option<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
    out: &mut ConfigArgs,
) -> anyhow::Result<bool> {
    match token {
        "--config" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--config requires a value");
            };
            out.config = PathBuf::from(v);
            out.explicit = true;
        }
        _ if token.starts_with("--config=") => {
            out.config = PathBuf::from(token.trim_start_matches("--config="));
            out.explicit = true;
        }
        "--database" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--database requires a value");
            };
            out.database = Some(v.to_string());
        }
        _ if token.starts_with("--database=") => {
            out.database = Some(token.trim_start_matches("--database=").to_string());
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_serve<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = ConfigArgs::default();
    let mut bind: Option<String> = None;

    while let Some(token) = it.next() {
        if parse_config_option(token, &mut it, &mut config)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Serve)),
            "--bind" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--bind requires a value");
                };
                bind = Some(v.to_string());
            }
            _ if token.starts_with("--bind=") => {
                bind = Some(token.trim_start_matches("--bind=").to_string());
            }
            _ => anyhow::bail!("unexpected argument for serve: {token}"),
        }
    }

    Ok(Command::Serve(ServeArgs { config, bind }))
}

fn parse_migrate<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = ConfigArgs::default();

    while let Some(token) = it.next() {
        if parse_config_option(token, &mut it, &mut config)? {
            continue;
        }
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Migrate)),
            _ => anyhow::bail!("unexpected argument for migrate: {token}"),
        }
    }

    Ok(Command::Migrate(MigrateArgs { config }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
jobly - companies and jobs over PostgreSQL

USAGE:
  jobly <COMMAND> [OPTIONS]

COMMANDS:
  serve         Run the HTTP API
  migrate       Apply pending schema migrations

Run `jobly <command> --help` for more."
            );
        }
        HelpTopic::Serve => {
            println!(
                "\
USAGE:
  jobly serve [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  --bind <ADDR>         Override server.bind from config
  -h, --help            Print help"
            );
        }
        HelpTopic::Migrate => {
            println!(
                "\
USAGE:
  jobly migrate [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml)
  --database <URL>      Override database.url from config
  -h, --help            Print help"
            );
        }
    }
}
