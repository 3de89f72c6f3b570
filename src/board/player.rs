//! Player identity.
//!
//! The two sides are called A and B internally; the protocol layer renders
//! them as 'x' and 'o'. Flat board snapshots use 0 = empty, 1 = A, 2 = B.

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    A,
    B,
}

pub const ALL_PLAYERS: [Player; 2] = [Player::A, Player::B];

impl Player {
    /// Returns the other player.
    pub const fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Returns the cell code used in flat snapshots (1 or 2).
    pub const fn cell_code(self) -> u8 {
        match self {
            Player::A => 1,
            Player::B => 2,
        }
    }

    /// Returns the single-character protocol abbreviation.
    pub const fn protocol_char(self) -> char {
        match self {
            Player::A => 'x',
            Player::B => 'o',
        }
    }

    /// Parses a player from its protocol abbreviation.
    pub fn from_protocol_char(c: char) -> Option<Player> {
        match c {
            'x' => Some(Player::A),
            'o' => Some(Player::B),
            _ => None,
        }
    }
}

impl serde::Serialize for Player {
    /// Serializes as the protocol abbreviation ('x' or 'o').
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.protocol_char())
    }
}
