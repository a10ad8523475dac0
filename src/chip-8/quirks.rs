/// How `FX1E` reports overflow of the index register in VF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOverflow {
    /// VF is set when `I + VX` exceeds 0xFF, as the original interpreter did.
    /// Some existing programs depend on it.
    Byte,
    /// VF is set when `I + VX` leaves the 12 bit address space (exceeds 0xFFF).
    Address,
    /// VF is left alone.
    Unflagged,
}

/// What `DXYN` does with pixels that fall outside the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteEdges {
    /// Wrap around to the opposite edge, modulo 64 and 32.
    Wrap,
    /// Drop the pixels.
    Clip,
}

/// Behaviours that differ between interpreters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    pub index_overflow: IndexOverflow,
    pub sprite_edges: SpriteEdges,
}

impl Quirks {
    pub fn index_overflow(mut self, index_overflow: IndexOverflow) -> Self {
        self.index_overflow = index_overflow;
        self
    }

    pub fn sprite_edges(mut self, sprite_edges: SpriteEdges) -> Self {
        self.sprite_edges = sprite_edges;
        self
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            index_overflow: IndexOverflow::Byte,
            sprite_edges: SpriteEdges::Wrap,
        }
    }
}

impl std::str::FromStr for IndexOverflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "byte" => Ok(IndexOverflow::Byte),
            "address" => Ok(IndexOverflow::Address),
            "unflagged" => Ok(IndexOverflow::Unflagged),
            other => Err(format!("Unknown index overflow mode {}", other)),
        }
    }
}

impl std::str::FromStr for SpriteEdges {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrap" => Ok(SpriteEdges::Wrap),
            "clip" => Ok(SpriteEdges::Clip),
            other => Err(format!("Unknown sprite edge mode {}", other)),
        }
    }
}
