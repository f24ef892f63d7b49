use bincode::{deserialize, serialize};
use log::{info, warn};
use shared::{Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// How long `connect` waits for the server's handshake reply.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Async client for the match server protocol.
pub struct ArenaClient {
    socket: UdpSocket,
    server_addr: SocketAddr,
    connection_id: Option<u64>,
}

impl ArenaClient {
    pub async fn new(server_addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        Ok(ArenaClient {
            socket,
            server_addr,
            connection_id: None,
        })
    }

    /// Connection id assigned by the server, once connected.
    pub fn connection_id(&self) -> Option<u64> {
        self.connection_id
    }

    pub async fn send_packet(&self, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    /// Waits for the next decodable frame from the server.
    pub async fn recv_packet(&self) -> Result<Packet, Box<dyn std::error::Error>> {
        let mut buffer = [0u8; 2048];
        loop {
            let (len, _) = self.socket.recv_from(&mut buffer).await?;
            match deserialize::<Packet>(&buffer[0..len]) {
                Ok(packet) => return Ok(packet),
                Err(_) => warn!("Failed to deserialize packet from server"),
            }
        }
    }

    /// Performs the connect handshake and stores the assigned id.
    pub async fn connect(&mut self) -> Result<u64, Box<dyn std::error::Error>> {
        info!("Connecting to server at {}...", self.server_addr);
        self.send_packet(&Packet::Connect {
            client_version: PROTOCOL_VERSION,
        })
        .await?;

        let reply = timeout(HANDSHAKE_TIMEOUT, async {
            loop {
                match self.recv_packet().await? {
                    Packet::Connected { connection_id } => return Ok(connection_id),
                    Packet::Error { message } => {
                        return Err::<u64, Box<dyn std::error::Error>>(message.into())
                    }
                    other => warn!("Unexpected packet during handshake: {:?}", other),
                }
            }
        })
        .await??;

        info!("Connected! Connection ID: {}", reply);
        self.connection_id = Some(reply);
        Ok(reply)
    }

    pub async fn join_queue(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.send_packet(&Packet::JoinQueue).await
    }

    pub async fn make_move(
        &self,
        game_id: &str,
        player_id: &str,
        san: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.send_packet(&Packet::MakeMove {
            game_id: game_id.to_string(),
            player_id: player_id.to_string(),
            san: san.to_string(),
        })
        .await
    }

    pub async fn get_board(&self, game_id: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.send_packet(&Packet::GetBoard {
            game_id: game_id.to_string(),
        })
        .await
    }

    /// Resumes a seat after a transport failure, using the token from the
    /// original match announcement.
    pub async fn reconnect(
        &self,
        game_id: &str,
        player_id: &str,
        token: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.send_packet(&Packet::Reconnect {
            game_id: game_id.to_string(),
            player_id: player_id.to_string(),
            token: token.to_string(),
        })
        .await
    }

    pub async fn ping(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.send_packet(&Packet::Ping).await
    }

    pub async fn disconnect(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.send_packet(&Packet::Disconnect).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_client_is_unconnected() {
        let client = ArenaClient::new("127.0.0.1:9002").await.unwrap();
        assert_eq!(client.connection_id(), None);
    }

    #[tokio::test]
    async fn test_new_client_rejects_bad_address() {
        assert!(ArenaClient::new("not an address").await.is_err());
    }
}
