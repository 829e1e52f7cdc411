//! Overload selection.

use rill_ir::TypeId;
use smallvec::SmallVec;

use super::def::Overload;
use super::{ResolveError, ResolvedCall, TypeRegistry};
use crate::coerce;

type Costs = SmallVec<[u8; 4]>;

/// Pick the best of `candidates` for the given argument types.
///
/// Each candidate carries the type arguments of the definition it belongs
/// to; `type_args` are appended for member-level type parameters.
pub(super) fn select(
    reg: &TypeRegistry,
    candidates: &[(&Overload, &[TypeId])],
    type_args: &[TypeId],
    args: &[TypeId],
) -> Result<ResolvedCall, ResolveError> {
    let mut rendered = Vec::with_capacity(candidates.len());
    let mut viable: Vec<(ResolvedCall, Costs)> = Vec::new();

    for &(overload, def_args) in candidates {
        let subst: SmallVec<[TypeId; 4]> = def_args.iter().chain(type_args).copied().collect();
        let params: SmallVec<[TypeId; 4]> = overload
            .sig
            .params
            .iter()
            .map(|p| p.resolve(&subst, reg.pool()))
            .collect();
        rendered.push(reg.render_signature(overload.callable, &params));

        if usize::from(overload.sig.type_params) != type_args.len() || params.len() != args.len()
        {
            continue;
        }
        let costs: Option<Costs> = args
            .iter()
            .zip(&params)
            .map(|(&arg, &param)| coerce::implicit_cost(reg, arg, param))
            .collect();
        if let Some(costs) = costs {
            let ret = overload.sig.ret.resolve(&subst, reg.pool());
            viable.push((
                ResolvedCall {
                    callable: overload.callable,
                    params,
                    ret,
                },
                costs,
            ));
        }
    }

    match viable.len() {
        0 => Err(ResolveError::NoMatch {
            candidates: rendered,
        }),
        1 => Ok(viable.swap_remove(0).0),
        _ => {
            let winners: Vec<usize> = (0..viable.len())
                .filter(|&i| {
                    viable
                        .iter()
                        .enumerate()
                        .all(|(j, other)| i == j || dominates(&viable[i].1, &other.1))
                })
                .collect();
            if let [winner] = winners[..] {
                return Ok(viable.swap_remove(winner).0);
            }
            Err(ResolveError::Ambiguous {
                candidates: viable
                    .iter()
                    .map(|(call, _)| reg.render_signature(call.callable, &call.params))
                    .collect(),
            })
        }
    }
}

/// `a` is no worse than `b` on every argument and better on at least one.
fn dominates(a: &[u8], b: &[u8]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y) && a != b
}

#[cfg(test)]
mod tests {
    use super::dominates;

    #[test]
    fn dominance_requires_a_strict_improvement() {
        assert!(dominates(&[0, 1], &[1, 1]));
        assert!(!dominates(&[0, 1], &[0, 1]));
        assert!(!dominates(&[0, 2], &[1, 0]));
    }
}
