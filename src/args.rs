use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use morse_drill::{coding::morse::PRESETS, session::PRACTICE_MODES};

pub fn parse_args() -> ArgMatches {
    command().get_matches()
}

fn command() -> Command {
    Command::new("morse-drill")
        .about("Adaptive Morse code trainer.")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .args([
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path of the config file"),
            Arg::new("history")
                .long("history")
                .global(true)
                .help("Path of the session history file"),
            Arg::new("device")
                .short('d')
                .long("device")
                .global(true)
                .help("Output device, matched loosely by name"),
            Arg::new("char-wpm")
                .short('c')
                .long("char-wpm")
                .global(true)
                .value_parser(value_parser!(f64))
                .help("Speed of the characters themselves, in words per minute"),
            Arg::new("word-wpm")
                .short('w')
                .long("word-wpm")
                .global(true)
                .value_parser(value_parser!(f64))
                .help("Effective speed, stretches the gaps between characters and words"),
            Arg::new("frequency")
                .short('f')
                .long("frequency")
                .global(true)
                .value_parser(value_parser!(f64))
                .help("Tone frequency in Hz"),
        ])
        .subcommands([
            Command::new("play")
                .alias("p")
                .about("Plays some text as Morse code.")
                .arg(Arg::new("text").required(true)),
            Command::new("test-tone")
                .about("Plays a single dit to check the audio output."),
            Command::new("train")
                .alias("t")
                .about("Runs an adaptive practice session.")
                .args([
                    Arg::new("chars")
                        .long("chars")
                        .conflicts_with("preset")
                        .help("Characters to practice"),
                    Arg::new("preset")
                        .long("preset")
                        .value_parser(PRESETS.to_vec())
                        .help("Practice a predefined character set"),
                    Arg::new("rounds")
                        .short('r')
                        .long("rounds")
                        .value_parser(value_parser!(u32))
                        .help("Number of rounds, 0 runs until stopped"),
                    Arg::new("round-size")
                        .short('s')
                        .long("round-size")
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Characters per round"),
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .value_parser(PRACTICE_MODES.to_vec())
                        .help("How answers are given"),
                    Arg::new("no-stats")
                        .long("no-stats")
                        .action(ArgAction::SetTrue)
                        .help("Don't save the session to the history"),
                ]),
            Command::new("history")
                .alias("h")
                .about("Shows and manages past sessions.")
                .subcommand_required(true)
                .subcommands([
                    Command::new("list").about("Lists past sessions."),
                    Command::new("show")
                        .about("Shows the statistics of one session.")
                        .arg(
                            Arg::new("index")
                                .required(true)
                                .value_parser(value_parser!(usize))
                                .help("Index from `history list`"),
                        ),
                    Command::new("progress").about("Shows accuracy and response time over time."),
                    Command::new("export")
                        .about("Writes the history to a file.")
                        .arg(Arg::new("path").required(true)),
                    Command::new("import")
                        .about("Reads sessions from a file.")
                        .args([
                            Arg::new("path").required(true),
                            Arg::new("replace")
                                .long("replace")
                                .action(ArgAction::SetTrue)
                                .help("Replace the history instead of adding to it"),
                        ]),
                    Command::new("clear").about("Deletes all sessions.").arg(
                        Arg::new("yes")
                            .short('y')
                            .long("yes")
                            .action(ArgAction::SetTrue)
                            .help("Don't ask for confirmation"),
                    ),
                ]),
            Command::new("config")
                .about("Shows or saves the trainer defaults.")
                .subcommand_required(true)
                .subcommands([
                    Command::new("show").about("Prints the config in effect."),
                    Command::new("save")
                        .about("Saves the config in effect, including flags given on this command line."),
                ]),
        ])
}
