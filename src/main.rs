use clap::Parser;
use env_logger::Env;
use macroquad::prelude::*;

use snake_grid::config::Args;
use snake_grid::game::{Game, Phase, TickOutcome};
use snake_grid::input::{self, Command};
use snake_grid::render;
use snake_grid::storage::{self, JsonFileStore, MemoryStore, ScoreStore};
use snake_grid::ticker::Ticker;

const BACKGROUND: Color = Color::new(0.02, 0.02, 0.03, 1.0);

fn window_conf() -> Conf {
    Conf {
        window_title: "Snake".to_owned(),
        window_width: 640,
        window_height: 680,
        high_dpi: true,
        ..Default::default()
    }
}

fn open_store(args: &Args) -> Box<dyn ScoreStore> {
    if args.no_save {
        log::info!("High score kept in memory only");
        return Box::new(MemoryStore::default());
    }
    let path = args.save_file.clone().unwrap_or_else(storage::default_save_path);
    let store = JsonFileStore::new(path);
    log::info!("High score file: {:?}", store.path());
    Box::new(store)
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {:#}", e);
            std::process::exit(2);
        }
    };
    log::info!("Starting {:?} variant with {:?}", args.variant, config);

    let mut game = Game::new(config, open_store(&args));
    let renderer = render::for_variant(args.variant);
    let mut ticker = Ticker::new(get_time());

    loop {
        for command in input::poll_commands() {
            if command == Command::Quit {
                log::info!("Quit with score {}", game.score());
                return;
            }
            let was_running = game.phase() == Phase::Running;
            input::apply(&mut game, command);
            if !was_running && game.phase() == Phase::Running {
                ticker.restart(get_time());
            }
        }

        if game.phase() == Phase::Running && ticker.due(get_time(), game.tick_interval()) {
            if let TickOutcome::Ate = game.advance() {
                log::debug!("Tick interval now {:?}", game.tick_interval());
            }
        }

        clear_background(BACKGROUND);
        renderer.draw(&game.snapshot());

        next_frame().await;
    }
}
