#![allow(clippy::cargo_common_metadata)]
use anyhow::Result;
use std::process::ExitCode;
use std::time::Duration;
use termtool::{
    Arg, ArgAction, Namespace, ProgressBar, Table, Termtool, Tool, ToolBuilder, critical,
    interrupt, subcommand, value_parser,
};
use tracing::{debug, error, info, warn};

/// A script that frobs or displays bazzes.
#[derive(Debug, Default)]
struct Example {
    name: Option<String>,
}

impl Example {
    fn loglevel(&mut self, _args: &Namespace) -> Result<()> {
        critical!("critical");
        error!("error");
        warn!("warning");
        info!("info");
        debug!("debug");
        Ok(())
    }

    fn frob(&mut self, args: &Namespace) -> Result<()> {
        let baz = args.get_str("baz").unwrap_or_default();
        let steps = args.get_one::<u64>("steps").copied().unwrap_or(0);

        if steps > 0 {
            let mut bar = ProgressBar::new(steps);
            for _ in 0..steps {
                interrupt::check()?;
                std::thread::sleep(Duration::from_millis(20));
                bar.inc(1)?;
            }
            bar.finish()?;
        }

        match &self.name {
            Some(name) => info!("{} frobbed {}", name, baz),
            None => info!("Frobbed {}", baz),
        }
        Ok(())
    }

    fn display(&mut self, args: &Namespace) -> Result<()> {
        let baz = args.get_str("baz").unwrap_or_default();
        let owner = self.name.as_deref().unwrap_or("-");

        if args.get_flag("csv") {
            println!("baz,length,owner");
            println!("{},{},{}", baz, baz.chars().count(), owner);
        } else {
            let mut table = Table::new(["baz", "length", "owner"]);
            table.add_row([baz.to_string(), baz.chars().count().to_string(), owner.to_string()])?;
            println!("{table}");
        }
        Ok(())
    }

    fn save_config(&mut self, args: &Namespace) -> Result<()> {
        let config_file = args
            .config_file()
            .ok_or_else(|| anyhow::anyhow!("No config file available"))?;
        let saved: Vec<&String> = args.get_many::<String>("args");

        config_file.write(saved.iter().map(|s| s.as_str()))?;
        info!(
            "Saved {} argument(s) to {}",
            saved.len(),
            config_file.path().display()
        );
        Ok(())
    }
}

impl Termtool for Example {
    fn declare(tool: ToolBuilder<Self>) -> ToolBuilder<Self> {
        tool.doc("A script that frobs or displays bazzes.")
            .arg(
                Arg::new("name")
                    .long("name")
                    .help("who is doing the frobbing"),
            )
            .subcommand(subcommand!(Example::loglevel).help("log one message at each level"))
            .subcommand(
                subcommand!(Example::frob)
                    .help("frob a baz")
                    .doc("Do the work to frob a baz.")
                    .arg(Arg::new("baz").required(true).help("the baz to frob"))
                    .arg(
                        Arg::new("steps")
                            .long("steps")
                            .value_parser(value_parser!(u64))
                            .default_value("0")
                            .help("number of frobbing passes"),
                    ),
            )
            .subcommand(
                subcommand!(Example::display)
                    .help("display a baz")
                    .doc("Display a baz.")
                    .arg(Arg::new("baz").required(true).help("the baz to display"))
                    .arg(
                        Arg::new("csv")
                            .long("csv")
                            .action(ArgAction::SetTrue)
                            .help("sets display mode to CSV"),
                    ),
            )
            .subcommand(
                subcommand!(Example::save_config)
                    .name("configure")
                    .help("save arguments for every later run")
                    .epilog("Pass options after `--`, e.g. `configure -- --name alice`.")
                    .arg(
                        Arg::new("args")
                            .num_args(1..)
                            .help("arguments to save"),
                    ),
            )
    }

    fn configure(&mut self, args: &Namespace) -> Result<()> {
        self.name = args.get_str("name").map(String::from);
        Ok(())
    }
}

fn main() -> Result<ExitCode> {
    let code = Tool::new(Example::default())?.run()?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
