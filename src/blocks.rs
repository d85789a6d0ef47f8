//! Program translator: the block editor's JSON program -> [`Program`].
//!
//! The editor emits a tree of blocks keyed by their Blockly type names. Only the
//! block kinds below are understood; anything else is a malformed program.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::TranslationError;
use crate::program::{Instruction, Limits, Program};

/// Block types offered by the toolbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    MoveForward,
    TurnLeft,
    TurnRight,
    ControlsRepeatExt,
    IfFrontIsClear,
    RepeatUntil,
    #[serde(rename = "procedures_defnoreturn")]
    ProcedureDefinition,
    #[serde(rename = "procedures_callnoreturn")]
    ProcedureCall,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::MoveForward => "move_forward",
            BlockKind::TurnLeft => "turn_left",
            BlockKind::TurnRight => "turn_right",
            BlockKind::ControlsRepeatExt => "controls_repeat_ext",
            BlockKind::IfFrontIsClear => "if_front_is_clear",
            BlockKind::RepeatUntil => "repeat_until",
            BlockKind::ProcedureDefinition => "procedures_defnoreturn",
            BlockKind::ProcedureCall => "procedures_callnoreturn",
        }
    }
}

/// One statement block. Statement inputs (`DO`) become nested vectors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    MoveForward,
    TurnLeft,
    TurnRight,
    ControlsRepeatExt {
        times: u32,
        #[serde(rename = "do", default)]
        body: Vec<Block>,
    },
    IfFrontIsClear {
        #[serde(rename = "do", default)]
        body: Vec<Block>,
    },
    RepeatUntil {
        #[serde(rename = "do", default)]
        body: Vec<Block>,
    },
    #[serde(rename = "procedures_callnoreturn")]
    CallProcedure { name: String },
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::MoveForward => BlockKind::MoveForward,
            Block::TurnLeft => BlockKind::TurnLeft,
            Block::TurnRight => BlockKind::TurnRight,
            Block::ControlsRepeatExt { .. } => BlockKind::ControlsRepeatExt,
            Block::IfFrontIsClear { .. } => BlockKind::IfFrontIsClear,
            Block::RepeatUntil { .. } => BlockKind::RepeatUntil,
            Block::CallProcedure { .. } => BlockKind::ProcedureCall,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureDef {
    pub name: String,
    #[serde(default)]
    pub body: Vec<Block>,
}

/// Whole workspace: top-level procedure definitions plus the main stack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockProgram {
    #[serde(default)]
    pub procedures: Vec<ProcedureDef>,
    #[serde(default)]
    pub main: Vec<Block>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TranslateOptions<'a> {
    pub limits: Limits,
    /// Blocks the current level offers; `None` allows everything.
    pub toolbox: Option<&'a [BlockKind]>,
}

pub fn parse_program(json: &str) -> Result<BlockProgram, TranslationError> {
    serde_json::from_str(json).map_err(|e| TranslationError::Malformed(e.to_string()))
}

/// Validate the block tree and produce a flattened [`Program`].
pub fn translate(
    program: &BlockProgram,
    opts: &TranslateOptions<'_>,
) -> Result<Program, TranslationError> {
    let mut names = BTreeSet::new();
    for def in &program.procedures {
        if def.name.trim().is_empty() {
            return Err(TranslationError::EmptyProcedureName);
        }
        if !names.insert(def.name.as_str()) {
            return Err(TranslationError::DuplicateProcedure { name: def.name.clone() });
        }
    }
    if !program.procedures.is_empty() {
        check_available(BlockKind::ProcedureDefinition, opts)?;
    }

    let ctx = Translator { names: &names, opts };
    let mut out = Program::new(ctx.convert(&program.main, 0)?);
    for def in &program.procedures {
        let body = ctx.convert(&def.body, 0)?;
        out.procedures.insert(def.name.clone(), body);
    }
    out.flattened(&opts.limits)
}

/// Convenience: parse then translate.
pub fn translate_json(json: &str, opts: &TranslateOptions<'_>) -> Result<Program, TranslationError> {
    translate(&parse_program(json)?, opts)
}

fn check_available(kind: BlockKind, opts: &TranslateOptions<'_>) -> Result<(), TranslationError> {
    match opts.toolbox {
        Some(allowed) if !allowed.contains(&kind) => {
            Err(TranslationError::BlockNotAvailable { block: kind })
        }
        _ => Ok(()),
    }
}

struct Translator<'a> {
    names: &'a BTreeSet<&'a str>,
    opts: &'a TranslateOptions<'a>,
}

impl Translator<'_> {
    fn convert(&self, blocks: &[Block], depth: usize) -> Result<Vec<Instruction>, TranslationError> {
        let limit = self.opts.limits.max_nesting_depth;
        if depth > limit {
            return Err(TranslationError::NestingTooDeep { limit });
        }
        let mut out = Vec::with_capacity(blocks.len());
        for block in blocks {
            check_available(block.kind(), self.opts)?;
            let ins = match block {
                Block::MoveForward => Instruction::Move,
                Block::TurnLeft => Instruction::TurnLeft,
                Block::TurnRight => Instruction::TurnRight,
                Block::ControlsRepeatExt { times, body } => {
                    Instruction::repeat(*times, self.convert(body, depth + 1)?)
                }
                Block::IfFrontIsClear { body } => {
                    Instruction::if_path_clear(self.convert(body, depth + 1)?)
                }
                Block::RepeatUntil { body } => {
                    Instruction::repeat_until_goal(self.convert(body, depth + 1)?)
                }
                Block::CallProcedure { name } => {
                    if !self.names.contains(name.as_str()) {
                        return Err(TranslationError::UnknownProcedure { name: name.clone() });
                    }
                    Instruction::call(name.clone())
                }
            };
            out.push(ins);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_translate_full_program() {
        let json = r#"{
            "procedures": [{ "name": "hop", "body": [{ "type": "move_forward" }, { "type": "turn_left" }] }],
            "main": [
                { "type": "controls_repeat_ext", "times": 2, "do": [{ "type": "turn_right" }] },
                { "type": "if_front_is_clear", "do": [{ "type": "move_forward" }] },
                { "type": "repeat_until", "do": [{ "type": "procedures_callnoreturn", "name": "hop" }] }
            ]
        }"#;
        let prog = translate_json(json, &TranslateOptions::default()).unwrap();
        assert_eq!(
            prog.main,
            vec![
                Instruction::TurnRight,
                Instruction::TurnRight,
                Instruction::if_path_clear(vec![Instruction::Move]),
                Instruction::repeat_until_goal(vec![Instruction::call("hop")]),
            ]
        );
        assert_eq!(
            prog.procedures.get("hop"),
            Some(&vec![Instruction::Move, Instruction::TurnLeft])
        );
    }

    #[test]
    fn test_malformed_programs() {
        let opts = TranslateOptions::default();
        for bad in [
            "not json",
            r#"{ "main": [{ "type": "fly" }] }"#,
            r#"{ "main": [{ "type": "controls_repeat_ext", "times": -1 }] }"#,
            r#"{ "main": [{ "type": "if_front_is_clear", "do": { "type": "move_forward" } }] }"#,
        ] {
            assert!(
                matches!(translate_json(bad, &opts), Err(TranslationError::Malformed(_))),
                "expected malformed for {bad}"
            );
        }
    }

    #[test]
    fn test_procedure_validation() {
        let opts = TranslateOptions::default();
        let unknown = r#"{ "main": [{ "type": "procedures_callnoreturn", "name": "ghost" }] }"#;
        assert_eq!(
            translate_json(unknown, &opts),
            Err(TranslationError::UnknownProcedure { name: "ghost".into() })
        );
        let dup = r#"{ "procedures": [{ "name": "a" }, { "name": "a" }] }"#;
        assert_eq!(
            translate_json(dup, &opts),
            Err(TranslationError::DuplicateProcedure { name: "a".into() })
        );
        let empty = r#"{ "procedures": [{ "name": "  " }] }"#;
        assert_eq!(translate_json(empty, &opts), Err(TranslationError::EmptyProcedureName));
    }

    #[test]
    fn test_toolbox_enforced() {
        let toolbox = [BlockKind::MoveForward, BlockKind::TurnRight];
        let opts = TranslateOptions { toolbox: Some(&toolbox), ..Default::default() };
        assert!(translate_json(r#"{ "main": [{ "type": "move_forward" }] }"#, &opts).is_ok());
        assert_eq!(
            translate_json(
                r#"{ "main": [{ "type": "repeat_until", "do": [{ "type": "move_forward" }] }] }"#,
                &opts
            ),
            Err(TranslationError::BlockNotAvailable { block: BlockKind::RepeatUntil })
        );
        assert_eq!(
            translate_json(r#"{ "procedures": [{ "name": "p" }] }"#, &opts),
            Err(TranslationError::BlockNotAvailable { block: BlockKind::ProcedureDefinition })
        );
    }

    #[test]
    fn test_block_kind_names_round_trip_serde() {
        let kind: BlockKind = serde_json::from_str("\"procedures_defnoreturn\"").unwrap();
        assert_eq!(kind, BlockKind::ProcedureDefinition);
        assert_eq!(serde_json::to_string(&BlockKind::ControlsRepeatExt).unwrap(), "\"controls_repeat_ext\"");
    }
}
