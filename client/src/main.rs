use clap::Parser;
use client::ArenaClient;
use log::error;
use shared::Packet;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::interval;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to connect to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port
    #[clap(short, long, default_value = "9002")]
    port: u16,
}

/// The seat we are playing, learned from the match announcement.
struct Seat {
    game_id: String,
    player_id: String,
    token: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let address = format!("{}:{}", args.host, args.port);

    let mut arena = ArenaClient::new(&address).await?;
    arena.connect().await?;

    println!("Joining matchmaking queue, waiting for an opponent...");
    arena.join_queue().await?;

    let mut seat: Option<Seat> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Keep the transport alive; silence would count as a disconnect.
    let mut ping_interval = interval(Duration::from_secs(3));

    loop {
        tokio::select! {
            packet = arena.recv_packet() => {
                match packet {
                    Ok(packet) => {
                        if !handle_packet(packet, &mut seat) {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        break;
                    }
                }
            },

            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line.trim().to_string(),
                    None => break,
                };
                if line.is_empty() {
                    continue;
                }

                match (line.as_str(), &seat) {
                    ("quit", _) => break,
                    ("board", Some(seat)) => arena.get_board(&seat.game_id).await?,
                    ("token", Some(seat)) => {
                        println!("Reconnect with: game {} player {} token {}",
                                 seat.game_id, seat.player_id, seat.token);
                    }
                    (san, Some(seat)) => {
                        arena.make_move(&seat.game_id, &seat.player_id, san).await?;
                    }
                    (_, None) => println!("Still waiting for a match..."),
                }
            },

            _ = ping_interval.tick() => {
                if let Err(e) = arena.ping().await {
                    error!("Error sending ping: {}", e);
                }
            },
        }
    }

    arena.disconnect().await?;
    Ok(())
}

/// Prints one server frame. Returns false when the session is over.
fn handle_packet(packet: Packet, seat: &mut Option<Seat>) -> bool {
    match packet {
        Packet::MatchFound {
            game_id,
            player_id,
            assigned_color,
            first_move,
            token,
        } => {
            println!("Match found! You play {}.", assigned_color);
            if first_move == player_id {
                println!("You move first. Type a move in algebraic notation (e.g. e4).");
            } else {
                println!("Your opponent moves first.");
            }
            *seat = Some(Seat {
                game_id,
                player_id,
                token,
            });
        }

        Packet::MoveMade {
            san,
            rendered,
            game_over,
            status,
            ..
        } => {
            println!("\nMove: {}\n{}", san, rendered);
            if game_over {
                println!("\nGame over: {}", status);
                return false;
            }
        }

        Packet::BoardState {
            rendered,
            turn,
            status,
            game_over,
            ..
        } => {
            println!("\n{}\nTurn: {}", rendered, turn);
            if game_over {
                println!("Game over: {}", status);
                return false;
            }
        }

        Packet::OpponentDisconnected { message, .. } => println!("\n{}", message),
        Packet::OpponentReconnected { message, .. } => println!("\n{}", message),

        Packet::GameOver {
            status,
            winner,
            message,
        } => {
            match winner {
                Some(winner) => println!("\nGame over ({}): winner {}", status, winner),
                None => println!("\nGame over ({})", status),
            }
            println!("{}", message);
            return false;
        }

        Packet::QueueTimeout { message } => {
            println!("\n{}", message);
            return false;
        }

        Packet::Error { message } => println!("Error: {}", message),
        Packet::Pong => {}

        other => {
            error!("Unexpected packet: {:?}", other);
        }
    }
    true
}
