//! Assignment, compound assignment and `++`/`--`.

use jan_ir::{AssignOp, Expr, ExprKind, IncDecOp, Name};
use jan_values::{
    cannot_assign, undefined_variable, ControlAction, EvalError, EvalResult, TemporaryAssignable,
    Value,
};

use super::ExecResult;
use crate::indexing::index_place;
use crate::operators::{evaluate_binary, evaluate_inc_dec};
use crate::process::ScriptProcess;

/// Where an assignment stores its value.
enum Place {
    Variable(Name),
    Slot(TemporaryAssignable),
}

impl ScriptProcess<'_> {
    pub(crate) fn exec_assign(&mut self, target: &Expr, op: AssignOp, value: &Expr) -> ExecResult {
        let place = self.resolve_place(target)?;
        let new = match op.binary() {
            None => self.eval_expr(value)?.unpack(),
            Some(binary) => {
                let current = self.current_value(&place)?;
                let operand = self.eval_expr(value)?;
                evaluate_binary(&current, &operand, binary, &mut self.regexes)?
            }
        };
        self.store(place, new)?;
        Ok(())
    }

    /// `++x` yields the stepped value, `x++` the value before the step.
    pub(crate) fn eval_inc_dec(&mut self, op: IncDecOp, prefix: bool, target: &Expr) -> EvalResult {
        let place = self.resolve_place(target)?;
        let old = self.current_value(&place)?;
        let new = evaluate_inc_dec(&old, op)?;
        self.store(place, new.clone())?;
        Ok(if prefix { new } else { old.unpack() })
    }

    fn resolve_place(&mut self, target: &Expr) -> Result<Place, ControlAction> {
        match &target.kind {
            ExprKind::Ident(name) => Ok(Place::Variable(*name)),
            ExprKind::Member { object, name } => {
                let object = self.eval_expr(object)?;
                Ok(Place::Slot(self.attribute_place(&object, *name)?))
            }
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                Ok(Place::Slot(index_place(&object, &index)?))
            }
            _ => Err(cannot_assign("expression").into()),
        }
    }

    fn current_value(&self, place: &Place) -> Result<Value, EvalError> {
        match place {
            Place::Variable(name) => self
                .lookup(*name)
                .ok_or_else(|| undefined_variable(self.name_of(*name))),
            Place::Slot(slot) => Ok(slot.value().clone()),
        }
    }

    fn store(&mut self, place: Place, value: Value) -> Result<(), EvalError> {
        match place {
            Place::Variable(name) => {
                self.assign_name(name, value);
                Ok(())
            }
            Place::Slot(slot) => slot.assign(value),
        }
    }
}
