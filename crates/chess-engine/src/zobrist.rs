//! Zobrist keys for position signatures.
//!
//! A signature XORs one random key per occupied (kind, color, square), plus
//! keys for the side to move, each castling right and the en passant file.
//! Clocks are not part of it, so two positions that differ only in their
//! counters share a signature.

use chess_core::{Color, PieceKind, Square};

/// Zobrist hash keys, generated at compile time from a fixed seed.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][color][square]
    pieces: [[[u64; 64]; 2]; 6],
    black_to_move: u64,
    /// One key per castling bit (K, Q, k, q).
    castling: [u64; 4],
    /// Keys for the en passant target file.
    en_passant: [u64; 8],
}

const fn xorshift(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

impl ZobristKeys {
    const fn new() -> Self {
        let mut state = 0x9E3779B97F4A7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut kind = 0;
        while kind < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = xorshift(state);
                    pieces[kind][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            kind += 1;
        }

        state = xorshift(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = xorshift(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = xorshift(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub const fn piece_key(&self, kind: PieceKind, color: Color, square: Square) -> u64 {
        self.pieces[kind.index()][color.index()][square.index()]
    }

    #[inline]
    pub const fn side_key(&self, side: Color) -> u64 {
        match side {
            Color::White => 0,
            Color::Black => self.black_to_move,
        }
    }

    /// XOR of the keys for every bit set in a 4-bit castling mask.
    pub const fn castling_key(&self, rights: u8) -> u64 {
        let mut key = 0;
        let mut bit = 0;
        while bit < 4 {
            if rights & (1 << bit) != 0 {
                key ^= self.castling[bit];
            }
            bit += 1;
        }
        key
    }

    #[inline]
    pub const fn en_passant_key(&self, target: Option<Square>) -> u64 {
        match target {
            Some(sq) => self.en_passant[sq.file() as usize],
            None => 0,
        }
    }
}

/// Global Zobrist keys.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
