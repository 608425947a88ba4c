use std::io::{self, BufRead, Write};

use clap::Parser;
use color_eyre::eyre::{eyre, Result};

use chess_rooms::game::{Game, GameState};
use chess_rooms::types::{MoveError, Position};

#[derive(Parser, Debug)]
#[command(name = "chess_rooms")]
#[command(about = "Play a hotseat chess game in the terminal")]
struct Args {
    /// Name of the player with the white pieces
    #[arg(long, default_value = "white")]
    white: String,

    /// Name of the player with the black pieces
    #[arg(long, default_value = "black")]
    black: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut game = Game::new(args.white, args.black);
    println!(
        "game started {} - type moves like e2e4, or quit",
        game.started_at().format("%Y-%m-%d %H:%M")
    );

    let stdin = io::stdin();
    loop {
        println!();
        game.board().draw_to_terminal();

        let side = match game.state() {
            GameState::Checkmate(winner) => {
                println!(
                    "checkmate - {} ({}) wins",
                    game.player_name(winner),
                    winner.to_human()
                );
                break;
            }
            GameState::AwaitingMove(side) => side,
        };
        if game.is_in_check(side) {
            println!("{} is in check", side.to_human());
        }

        print!("{} ({}) to move: ", game.player_name(side), side.to_human());
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input == "quit" {
            break;
        }

        let (from, to) = match parse_move(input) {
            Ok(squares) => squares,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match game.player_move(from, to) {
            Ok(outcome) => {
                if let Some((rook_from, rook_to)) = outcome.rook_shift {
                    println!("rook moves {rook_from} to {rook_to}");
                }
                if outcome.check && outcome.winner.is_none() {
                    println!("check!");
                }
            }
            Err(err @ MoveError::IllegalMove { .. }) => println!("{err}"),
            Err(err) => {
                println!("{err}");
                break;
            }
        }
    }
    Ok(())
}

/// Parse "e2e4" or "e2 e4" into a from/to pair.
fn parse_move(input: &str) -> Result<(Position, Position)> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() != 4 || !cleaned.is_ascii() {
        return Err(eyre!("expected a move like e2e4"));
    }
    let from = Position::from_algebraic(&cleaned[..2])?;
    let to = Position::from_algebraic(&cleaned[2..])?;
    Ok((from, to))
}
