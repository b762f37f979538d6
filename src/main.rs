use std::process;

use log::{error, info, Level};

use exifscope::analysis::InclusionPolicy;
use exifscope::commands::{build_cli, CommandFactory, ExifscopeCommandFactory};
use exifscope::config::Config;
use exifscope::utils::logger::Logger;
use exifscope::ExifScope;

fn main() {
    let matches = build_cli().get_matches();

    let level = Logger::level_from_verbosity(matches.get_count("verbose"));
    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(log_file, level.to_level().unwrap_or(Level::Warn)) {
                eprintln!("Error setting up file logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str())).init();
        }
    }

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => match Config::from_file(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path);
                config
            }
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    if matches.get_flag("allow-list") {
        config.report.inclusion = InclusionPolicy::default_allow_list();
    }

    let scope = ExifScope::from_config(config);
    let factory = ExifscopeCommandFactory::new();

    match factory.create_command(&matches, &scope) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
