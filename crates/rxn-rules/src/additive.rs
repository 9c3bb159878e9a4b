use rxn_qn::QnValue;

use crate::rule::AdditiveQn;
use crate::view::{require, Restriction, Side, NodeView, Verdict, Violation};

pub(crate) fn evaluate(qn: AdditiveQn, view: &NodeView<'_>) -> Verdict {
    let edge_qn = qn.edge_qn();
    let mut incoming = 0i64;
    let mut outgoing = 0i64;
    let mut open = Vec::new();
    for (side, position, slot) in view.slots() {
        let Some(state) = slot else {
            open.push((side, position));
            continue;
        };
        let value = match require(state.qns.get(edge_qn), edge_qn.as_str(), side, position) {
            Ok(QnValue::Int(value)) => value,
            Ok(other) => {
                return Verdict::Fail(Violation::missing(format!(
                    "{side} edge {position} carries non-integer {edge_qn} {other}"
                )))
            }
            Err(violation) => return Verdict::Fail(violation),
        };
        match side {
            Side::Incoming => incoming += value,
            Side::Outgoing => outgoing += value,
        }
    }
    match open.as_slice() {
        [] if incoming == outgoing => Verdict::Pass,
        [] => Verdict::Fail(Violation::violated(format!(
            "{edge_qn}: {incoming} incoming vs {outgoing} outgoing"
        ))),
        [(side, position)] => {
            let required = match side {
                Side::Incoming => outgoing - incoming,
                Side::Outgoing => incoming - outgoing,
            };
            Verdict::Restrict(Restriction {
                side: *side,
                position: *position,
                qn: edge_qn,
                allowed: vec![QnValue::Int(required)],
            })
        }
        _ => Verdict::Deferred,
    }
}
