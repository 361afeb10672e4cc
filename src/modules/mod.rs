use anyhow::{Context, Result};
use clap::ArgMatches;
use morse_drill::{
    audio::{output_or_silent, AudioDevice, Player},
    config::{Config, ConfigStore, FileConfigStore},
    history::FileHistoryStore,
};

pub mod config;
pub mod history;
pub mod play;
pub mod terminal;
pub mod train;

pub trait Module {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut InitContext) -> Result<()>;
}

pub struct InitContext {
    /// Matches of the module's own subcommand.
    pub args: ArgMatches,
    /// Stored config with the command line flags applied.
    pub config: Config,
    pub config_store: FileConfigStore,
    pub history_store: FileHistoryStore,
}

impl InitContext {
    pub fn new(global: &ArgMatches, args: ArgMatches) -> Self {
        let config_store = match global.get_one::<String>("config") {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        };
        let history_store = match global.get_one::<String>("history") {
            Some(path) => FileHistoryStore::with_path(path),
            None => FileHistoryStore::new(),
        };

        let mut config = config_store.load();
        if let Some(&x) = global.get_one::<f64>("char-wpm") {
            config.char_wpm = x;
        }
        if let Some(&x) = global.get_one::<f64>("word-wpm") {
            config.word_wpm = x;
        }
        if let Some(&x) = global.get_one::<f64>("frequency") {
            config.frequency = x;
        }
        if let Some(x) = global.get_one::<String>("device") {
            config.device = Some(x.to_owned());
        }

        Self {
            args,
            config,
            config_store,
            history_store,
        }
    }

    /// Opens the configured output and a player set up with the configured tone.
    /// The device has to outlive the player.
    pub fn open_player(&self) -> Result<(Option<AudioDevice>, Player)> {
        let (device, output) = output_or_silent(self.config.device.as_deref());
        match &device {
            Some(x) => println!("[*] Output hooked into `{}` ({})", x.name(), output.sample_rate()),
            None => println!("[-] No audio output, playing silently"),
        }

        let mut player = Player::new(output);
        player
            .configure(&self.config.tone())
            .context("invalid tone settings")?;
        Ok((device, player))
    }
}

pub fn get_module(name: &str) -> Option<Box<dyn Module>> {
    Some(match name {
        "play" => Box::new(play::Play),
        "test-tone" => Box::new(play::TestTone),
        "train" => Box::new(train::Train),
        "history" => Box::new(history::History),
        "config" => Box::new(config::ConfigModule),
        _ => return None,
    })
}
