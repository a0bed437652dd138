//! WASM bindings for polytile-core
//!
//! Provides a JavaScript-friendly handle on the move table of a variant.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::{BoardConst, Move, Piece, Registry, Variant, NU_ADJ_STATUS};

static REGISTRY: Registry = Registry::new();

/// Move table of one variant
#[wasm_bindgen]
pub struct WasmMoveTable {
    variant: Variant,
    bc: Arc<BoardConst>,
}

#[wasm_bindgen]
impl WasmMoveTable {
    /// Open the table of a variant by game-record name, e.g. "duo"
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str) -> Result<WasmMoveTable, JsError> {
        let variant: Variant = variant.parse()?;
        let bc = Arc::clone(REGISTRY.for_variant(variant));
        Ok(WasmMoveTable { variant, bc })
    }

    pub fn variant(&self) -> String {
        self.variant.to_string()
    }

    /// Number of moves including the null move
    #[wasm_bindgen(js_name = nuMoves)]
    pub fn nu_moves(&self) -> usize {
        self.bc.nu_moves()
    }

    /// Text form of a move, e.g. "[V5]a1,a2,a3,b1,c1"
    #[wasm_bindgen(js_name = toText)]
    pub fn to_text(&self, mv: u16, with_piece_name: bool) -> Result<String, JsError> {
        let mv = self.checked_move(mv)?;
        Ok(self.bc.to_text(mv, with_piece_name))
    }

    /// Parse a comma-separated point list. Returns the move id
    #[wasm_bindgen(js_name = fromText)]
    pub fn from_text(&self, text: &str) -> Result<u16, JsError> {
        Ok(self.bc.from_text(text)?.0)
    }

    /// Point labels of a move
    #[wasm_bindgen(js_name = movePoints)]
    pub fn move_points(&self, mv: u16) -> Result<JsValue, JsError> {
        let mv = self.checked_move(mv)?;
        let geo = self.bc.geometry();
        let labels: Vec<String> = self
            .bc
            .move_points(mv)
            .iter()
            .map(|&p| geo.to_label(p))
            .collect();
        Ok(serde_wasm_bindgen::to_value(&labels)?)
    }

    /// Full description of a move as a JS object
    #[wasm_bindgen(js_name = moveRecord)]
    pub fn move_record(&self, mv: u16) -> Result<JsValue, JsError> {
        let mv = self.checked_move(mv)?;
        Ok(serde_wasm_bindgen::to_value(&self.bc.move_record(mv))?)
    }

    /// Piece names in catalog order
    #[wasm_bindgen(js_name = pieceNames)]
    pub fn piece_names(&self) -> Vec<String> {
        self.bc
            .catalog()
            .pieces()
            .map(|p| self.bc.piece_info(p).name().to_string())
            .collect()
    }

    /// Move ids of a piece through a point under an adjacency status
    pub fn lookup(&self, point: &str, status: u8, piece: &str) -> Result<Vec<u16>, JsError> {
        let geo = self.bc.geometry();
        let p = geo
            .from_label(point)
            .ok_or_else(|| JsError::new(&format!("invalid point '{}'", point)))?;
        if status as usize >= NU_ADJ_STATUS {
            return Err(JsError::new(&format!("invalid status {}", status)));
        }
        let piece: Piece = self
            .bc
            .piece_by_name(piece)
            .ok_or_else(|| JsError::new(&format!("unknown piece '{}'", piece)))?;
        Ok(self.bc.lookup(p, status, piece).iter().map(|mv| mv.0).collect())
    }

    /// Summary of the table as a JS object
    pub fn summary(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.bc.summary())?)
    }
}

impl WasmMoveTable {
    fn checked_move(&self, mv: u16) -> Result<Move, JsError> {
        if (mv as usize) < self.bc.nu_moves() {
            Ok(Move(mv))
        } else {
            Err(JsError::new(&format!("invalid move id {}", mv)))
        }
    }
}
