use crate::demo::{list_modules, run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Assessment Orchestrator",
    about = "Run multi-module candidate assessments over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the selectable assessment modules
    Modules,
    /// Walk a scripted candidate through a full assessment run
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Modules => {
            list_modules();
            Ok(())
        }
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talent_ai::workflows::assessment::{CultureProfile, ModuleId};

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["talent-ai-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn demo_accepts_module_list_and_culture() {
        let cli = Cli::try_parse_from([
            "talent-ai-api",
            "demo",
            "--modules",
            "mbti,big_five",
            "--culture",
            "enterprise",
        ])
        .expect("parses");

        let Some(Command::Demo(args)) = cli.command else {
            panic!("expected demo command");
        };
        assert_eq!(args.modules, vec![ModuleId::Mbti, ModuleId::BigFive]);
        assert_eq!(args.culture, Some(CultureProfile::EnterpriseCorporate));
    }

    #[test]
    fn demo_rejects_unknown_modules() {
        let err = Cli::try_parse_from(["talent-ai-api", "demo", "--modules", "astrology"])
            .expect_err("unknown module");
        assert!(err.to_string().contains("astrology"));
    }
}
