use clap::Parser;
use keyseal::cli::{commands, load_settings, output, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            output::error(&e.to_string());
            std::process::exit(1);
        }
    };
    keyseal::logging::init(&settings.log_level, cli.verbose);

    let result = match cli.command {
        Commands::Seal {
            ref input,
            ref hex,
        } => commands::seal::execute(&settings, input.as_deref(), hex.as_deref()),
        Commands::Generate => commands::generate::execute(&settings),
        Commands::Open {
            ref file,
            reveal,
            yes,
        } => commands::open::execute(&settings, file.as_deref(), reveal, yes),
        Commands::Inspect { ref file } => commands::inspect::execute(file.as_deref()),
        Commands::GenMaster => commands::gen_master::execute(),
        Commands::Version => commands::version::execute(),
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        if e.is_unrecoverable() {
            output::tip("This envelope cannot be recovered; issue a new one.");
        }
        std::process::exit(1);
    }
}
