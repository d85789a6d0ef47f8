//! Instruction model produced by the block translator and consumed by the
//! interpreter. Programs are plain data; nothing here is ever evaluated as text.

use std::collections::BTreeMap;

use crate::error::TranslationError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Move,
    TurnLeft,
    TurnRight,
    RepeatN { count: u32, body: Vec<Instruction> },
    IfPathClear { body: Vec<Instruction> },
    RepeatUntilGoal { body: Vec<Instruction> },
    CallProcedure { name: String },
}

impl Instruction {
    pub fn repeat(count: u32, body: Vec<Instruction>) -> Self {
        Instruction::RepeatN { count, body }
    }

    pub fn if_path_clear(body: Vec<Instruction>) -> Self {
        Instruction::IfPathClear { body }
    }

    pub fn repeat_until_goal(body: Vec<Instruction>) -> Self {
        Instruction::RepeatUntilGoal { body }
    }

    pub fn call(name: impl Into<String>) -> Self {
        Instruction::CallProcedure { name: name.into() }
    }
}

/// A translated program: the main sequence plus named procedure bodies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub main: Vec<Instruction>,
    pub procedures: BTreeMap<String, Vec<Instruction>>,
}

impl Program {
    pub fn new(main: Vec<Instruction>) -> Self {
        Self { main, procedures: BTreeMap::new() }
    }

    pub fn with_procedure(mut self, name: impl Into<String>, body: Vec<Instruction>) -> Self {
        self.procedures.insert(name.into(), body);
        self
    }

    /// Flatten the main body and every procedure body under one shared budget.
    pub fn flattened(&self, limits: &Limits) -> Result<Program, TranslationError> {
        let mut budget = Budget::new(limits.max_expanded_instructions);
        let mut main = Vec::new();
        flatten_into(&self.main, &mut main, 0, limits, &mut budget)?;
        let mut procedures = BTreeMap::new();
        for (name, body) in &self.procedures {
            let mut flat = Vec::new();
            flatten_into(body, &mut flat, 0, limits, &mut budget)?;
            procedures.insert(name.clone(), flat);
        }
        Ok(Program { main, procedures })
    }
}

/// Guards applied while flattening.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_expanded_instructions: usize,
    pub max_nesting_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_expanded_instructions: 10_000, max_nesting_depth: 32 }
    }
}

struct Budget {
    used: usize,
    limit: usize,
}

impl Budget {
    fn new(limit: usize) -> Self {
        Self { used: 0, limit }
    }

    fn charge(&mut self, n: usize) -> Result<(), TranslationError> {
        match self.used.checked_add(n) {
            Some(total) if total <= self.limit => {
                self.used = total;
                Ok(())
            }
            _ => Err(TranslationError::TooManyInstructions { limit: self.limit }),
        }
    }
}

/// Unroll every `RepeatN`, including those nested in conditional, loop and
/// procedure bodies. The output never contains `RepeatN`.
pub fn flatten(src: &[Instruction], limits: &Limits) -> Result<Vec<Instruction>, TranslationError> {
    let mut budget = Budget::new(limits.max_expanded_instructions);
    let mut out = Vec::new();
    flatten_into(src, &mut out, 0, limits, &mut budget)?;
    Ok(out)
}

fn flatten_into(
    src: &[Instruction],
    out: &mut Vec<Instruction>,
    depth: usize,
    limits: &Limits,
    budget: &mut Budget,
) -> Result<(), TranslationError> {
    if depth > limits.max_nesting_depth {
        return Err(TranslationError::NestingTooDeep { limit: limits.max_nesting_depth });
    }
    for ins in src {
        match ins {
            Instruction::RepeatN { count, body } => {
                // A zero-count repeat never looks at its body.
                if *count == 0 {
                    continue;
                }
                let before = budget.used;
                let mut unit = Vec::new();
                flatten_into(body, &mut unit, depth + 1, limits, budget)?;
                if unit.is_empty() {
                    continue;
                }
                let unit_cost = budget.used - before;
                // One copy is already charged.
                let extra = unit_cost
                    .checked_mul(*count as usize - 1)
                    .ok_or(TranslationError::TooManyInstructions { limit: budget.limit })?;
                budget.charge(extra)?;
                out.reserve(unit.len() * *count as usize);
                for _ in 0..*count {
                    out.extend(unit.iter().cloned());
                }
            }
            Instruction::IfPathClear { body } => {
                budget.charge(1)?;
                let mut inner = Vec::new();
                flatten_into(body, &mut inner, depth + 1, limits, budget)?;
                out.push(Instruction::IfPathClear { body: inner });
            }
            Instruction::RepeatUntilGoal { body } => {
                budget.charge(1)?;
                let mut inner = Vec::new();
                flatten_into(body, &mut inner, depth + 1, limits, budget)?;
                out.push(Instruction::RepeatUntilGoal { body: inner });
            }
            simple => {
                budget.charge(1)?;
                out.push(simple.clone());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use Instruction::*;

    #[test]
    fn test_repeat_unrolls_in_order() {
        let flat = flatten(&[Instruction::repeat(2, vec![Move, TurnRight])], &Limits::default()).unwrap();
        assert_eq!(flat, vec![Move, TurnRight, Move, TurnRight]);
    }

    #[test]
    fn test_repeat_zero_is_empty() {
        let flat = flatten(
            &[Instruction::repeat(0, vec![Move, Instruction::repeat(5, vec![Move])]), TurnLeft],
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(flat, vec![TurnLeft]);
    }

    #[test]
    fn test_nested_repeat_inside_conditional_is_unrolled() {
        let flat = flatten(
            &[Instruction::repeat_until_goal(vec![Instruction::if_path_clear(vec![
                Instruction::repeat(3, vec![Move]),
            ])])],
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(
            flat,
            vec![Instruction::repeat_until_goal(vec![Instruction::if_path_clear(vec![
                Move, Move, Move
            ])])]
        );
    }

    #[test]
    fn test_expansion_cap() {
        let limits = Limits { max_expanded_instructions: 100, max_nesting_depth: 32 };
        assert!(flatten(&[Instruction::repeat(100, vec![Move])], &limits).is_ok());
        assert_eq!(
            flatten(&[Instruction::repeat(101, vec![Move])], &limits),
            Err(TranslationError::TooManyInstructions { limit: 100 })
        );
        let huge = Instruction::repeat(u32::MAX, vec![Instruction::repeat(u32::MAX, vec![Move])]);
        assert!(matches!(
            flatten(&[huge], &limits),
            Err(TranslationError::TooManyInstructions { .. })
        ));
    }

    #[test]
    fn test_zero_count_ignores_oversized_body() {
        let flat = flatten(
            &[Instruction::repeat(0, vec![Instruction::repeat(u32::MAX, vec![Move])])],
            &Limits::default(),
        )
        .unwrap();
        assert!(flat.is_empty());
    }

    #[test]
    fn test_huge_count_with_empty_body_is_instant() {
        let flat = flatten(
            &[
                Instruction::repeat(u32::MAX, vec![]),
                Instruction::repeat(u32::MAX, vec![Instruction::repeat(0, vec![Move])]),
                Move,
            ],
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(flat, vec![Move]);
    }

    #[test]
    fn test_nesting_cap() {
        let limits = Limits { max_expanded_instructions: 100, max_nesting_depth: 2 };
        let mut deep = vec![Move];
        for _ in 0..3 {
            deep = vec![Instruction::if_path_clear(deep)];
        }
        assert_eq!(flatten(&deep, &limits), Err(TranslationError::NestingTooDeep { limit: 2 }));
    }

    #[test]
    fn test_program_budget_is_shared_with_procedures() {
        let limits = Limits { max_expanded_instructions: 10, max_nesting_depth: 8 };
        let prog = Program::new(vec![Instruction::repeat(6, vec![Move])])
            .with_procedure("walk", vec![Instruction::repeat(5, vec![Move])]);
        assert!(matches!(
            prog.flattened(&limits),
            Err(TranslationError::TooManyInstructions { .. })
        ));
    }
}
