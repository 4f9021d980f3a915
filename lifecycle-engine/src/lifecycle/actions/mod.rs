//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles one
//! specific command. Actions check against current state first and only
//! then stage mutations; the engine commits afterwards.

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use shared::models::EntityKind;
use shared::{AppResult, Command, CommandPayload, LifecycleEvent};

mod coupon;
mod dispute;
mod order;
mod payout;
mod project;
mod report;
mod review;
mod ticket;

pub use coupon::{CreateCouponAction, DeactivateCouponAction};
pub use dispute::{CloseDisputeAction, OpenDisputeAction, ResolveDisputeAction};
pub use order::{
    AcceptOrderAction, ApproveDeliveryAction, CancelOrderAction, CreateOrderAction,
    DeliverOrderAction, RequestRevisionAction,
};
pub use payout::{
    ApprovePayoutAction, CompletePayoutAction, RejectPayoutAction, RequestPayoutAction,
};
pub use project::{
    AcceptProposalAction, PostProjectAction, RejectProposalAction, SubmitProposalAction,
    WithdrawProposalAction,
};
pub use report::{DismissReportAction, FileReportAction, ResolveReportAction};
pub use review::{HideReviewAction, ReplyReviewAction, SubmitReviewAction};
pub use ticket::{AssignTicketAction, CloseTicketAction, OpenTicketAction, ResolveTicketAction};

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    CreateOrder(CreateOrderAction),
    AcceptOrder(AcceptOrderAction),
    DeliverOrder(DeliverOrderAction),
    ApproveDelivery(ApproveDeliveryAction),
    RequestRevision(RequestRevisionAction),
    CancelOrder(CancelOrderAction),
    RequestPayout(RequestPayoutAction),
    ApprovePayout(ApprovePayoutAction),
    RejectPayout(RejectPayoutAction),
    CompletePayout(CompletePayoutAction),
    OpenDispute(OpenDisputeAction),
    ResolveDispute(ResolveDisputeAction),
    CloseDispute(CloseDisputeAction),
    FileReport(FileReportAction),
    ResolveReport(ResolveReportAction),
    DismissReport(DismissReportAction),
    OpenTicket(OpenTicketAction),
    AssignTicket(AssignTicketAction),
    ResolveTicket(ResolveTicketAction),
    CloseTicket(CloseTicketAction),
    PostProject(PostProjectAction),
    SubmitProposal(SubmitProposalAction),
    AcceptProposal(AcceptProposalAction),
    RejectProposal(RejectProposalAction),
    WithdrawProposal(WithdrawProposalAction),
    SubmitReview(SubmitReviewAction),
    ReplyReview(ReplyReviewAction),
    HideReview(HideReviewAction),
    CreateCoupon(CreateCouponAction),
    DeactivateCoupon(DeactivateCouponAction),
}

impl CommandHandler for CommandAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        match self {
            CommandAction::CreateOrder(action) => action.execute(ctx, metadata),
            CommandAction::AcceptOrder(action) => action.execute(ctx, metadata),
            CommandAction::DeliverOrder(action) => action.execute(ctx, metadata),
            CommandAction::ApproveDelivery(action) => action.execute(ctx, metadata),
            CommandAction::RequestRevision(action) => action.execute(ctx, metadata),
            CommandAction::CancelOrder(action) => action.execute(ctx, metadata),
            CommandAction::RequestPayout(action) => action.execute(ctx, metadata),
            CommandAction::ApprovePayout(action) => action.execute(ctx, metadata),
            CommandAction::RejectPayout(action) => action.execute(ctx, metadata),
            CommandAction::CompletePayout(action) => action.execute(ctx, metadata),
            CommandAction::OpenDispute(action) => action.execute(ctx, metadata),
            CommandAction::ResolveDispute(action) => action.execute(ctx, metadata),
            CommandAction::CloseDispute(action) => action.execute(ctx, metadata),
            CommandAction::FileReport(action) => action.execute(ctx, metadata),
            CommandAction::ResolveReport(action) => action.execute(ctx, metadata),
            CommandAction::DismissReport(action) => action.execute(ctx, metadata),
            CommandAction::OpenTicket(action) => action.execute(ctx, metadata),
            CommandAction::AssignTicket(action) => action.execute(ctx, metadata),
            CommandAction::ResolveTicket(action) => action.execute(ctx, metadata),
            CommandAction::CloseTicket(action) => action.execute(ctx, metadata),
            CommandAction::PostProject(action) => action.execute(ctx, metadata),
            CommandAction::SubmitProposal(action) => action.execute(ctx, metadata),
            CommandAction::AcceptProposal(action) => action.execute(ctx, metadata),
            CommandAction::RejectProposal(action) => action.execute(ctx, metadata),
            CommandAction::WithdrawProposal(action) => action.execute(ctx, metadata),
            CommandAction::SubmitReview(action) => action.execute(ctx, metadata),
            CommandAction::ReplyReview(action) => action.execute(ctx, metadata),
            CommandAction::HideReview(action) => action.execute(ctx, metadata),
            CommandAction::CreateCoupon(action) => action.execute(ctx, metadata),
            CommandAction::DeactivateCoupon(action) => action.execute(ctx, metadata),
        }
    }
}

/// Entity kinds a command writes; drives lock acquisition.
///
/// Read-only references (an order consulted while opening a dispute, the
/// orders scanned for a balance check) take no lock; the gateway's atomic
/// save keeps those snapshots consistent.
pub fn write_kinds(payload: &CommandPayload) -> Vec<EntityKind> {
    match payload {
        CommandPayload::CreateOrder { coupon_code, .. } => {
            if coupon_code.is_some() {
                vec![EntityKind::Coupon, EntityKind::Order]
            } else {
                vec![EntityKind::Order]
            }
        }
        CommandPayload::AcceptOrder { .. }
        | CommandPayload::DeliverOrder { .. }
        | CommandPayload::ApproveDelivery { .. }
        | CommandPayload::RequestRevision { .. }
        | CommandPayload::CancelOrder { .. } => vec![EntityKind::Order],

        CommandPayload::RequestPayout { .. }
        | CommandPayload::ApprovePayout { .. }
        | CommandPayload::RejectPayout { .. }
        | CommandPayload::CompletePayout { .. } => vec![EntityKind::Payout],

        CommandPayload::OpenDispute { .. }
        | CommandPayload::ResolveDispute { .. }
        | CommandPayload::CloseDispute { .. } => vec![EntityKind::Dispute],

        CommandPayload::FileReport { .. }
        | CommandPayload::ResolveReport { .. }
        | CommandPayload::DismissReport { .. } => vec![EntityKind::Report],

        CommandPayload::OpenTicket { .. }
        | CommandPayload::AssignTicket { .. }
        | CommandPayload::ResolveTicket { .. }
        | CommandPayload::CloseTicket { .. } => vec![EntityKind::SupportTicket],

        CommandPayload::PostProject { .. } => vec![EntityKind::Project],
        CommandPayload::SubmitProposal { .. }
        | CommandPayload::RejectProposal { .. }
        | CommandPayload::WithdrawProposal { .. } => vec![EntityKind::Proposal],
        CommandPayload::AcceptProposal { .. } => {
            vec![EntityKind::Project, EntityKind::Proposal]
        }

        CommandPayload::SubmitReview { .. }
        | CommandPayload::ReplyReview { .. }
        | CommandPayload::HideReview { .. } => vec![EntityKind::Review],

        CommandPayload::CreateCoupon { .. } | CommandPayload::DeactivateCoupon { .. } => {
            vec![EntityKind::Coupon]
        }
    }
}

/// Convert a Command to a CommandAction
///
/// This is the ONLY place with a match on CommandPayload.
impl From<&Command> for CommandAction {
    fn from(cmd: &Command) -> Self {
        match &cmd.payload {
            CommandPayload::CreateOrder {
                seller_id,
                service_id,
                gross_amount,
                coupon_code,
            } => CommandAction::CreateOrder(CreateOrderAction {
                seller_id: seller_id.clone(),
                service_id: service_id.clone(),
                gross_amount: *gross_amount,
                coupon_code: coupon_code.clone(),
            }),
            CommandPayload::AcceptOrder { order_id } => {
                CommandAction::AcceptOrder(AcceptOrderAction {
                    order_id: order_id.clone(),
                })
            }
            CommandPayload::DeliverOrder { order_id } => {
                CommandAction::DeliverOrder(DeliverOrderAction {
                    order_id: order_id.clone(),
                })
            }
            CommandPayload::ApproveDelivery { order_id } => {
                CommandAction::ApproveDelivery(ApproveDeliveryAction {
                    order_id: order_id.clone(),
                })
            }
            CommandPayload::RequestRevision { order_id } => {
                CommandAction::RequestRevision(RequestRevisionAction {
                    order_id: order_id.clone(),
                })
            }
            CommandPayload::CancelOrder { order_id, reason } => {
                CommandAction::CancelOrder(CancelOrderAction {
                    order_id: order_id.clone(),
                    reason: reason.clone(),
                })
            }
            CommandPayload::RequestPayout {
                amount,
                bank,
                account,
            } => CommandAction::RequestPayout(RequestPayoutAction {
                amount: *amount,
                bank: bank.clone(),
                account: account.clone(),
            }),
            CommandPayload::ApprovePayout { payout_id } => {
                CommandAction::ApprovePayout(ApprovePayoutAction {
                    payout_id: payout_id.clone(),
                })
            }
            CommandPayload::RejectPayout { payout_id, reason } => {
                CommandAction::RejectPayout(RejectPayoutAction {
                    payout_id: payout_id.clone(),
                    reason: reason.clone(),
                })
            }
            CommandPayload::CompletePayout { payout_id } => {
                CommandAction::CompletePayout(CompletePayoutAction {
                    payout_id: payout_id.clone(),
                })
            }
            CommandPayload::OpenDispute {
                order_id,
                reason,
                priority,
                amount,
            } => CommandAction::OpenDispute(OpenDisputeAction {
                order_id: order_id.clone(),
                reason: *reason,
                priority: *priority,
                amount: *amount,
            }),
            CommandPayload::ResolveDispute {
                dispute_id,
                resolution_note,
            } => CommandAction::ResolveDispute(ResolveDisputeAction {
                dispute_id: dispute_id.clone(),
                resolution_note: resolution_note.clone(),
            }),
            CommandPayload::CloseDispute { dispute_id } => {
                CommandAction::CloseDispute(CloseDisputeAction {
                    dispute_id: dispute_id.clone(),
                })
            }
            CommandPayload::FileReport {
                target_type,
                target_id,
                reason,
            } => CommandAction::FileReport(FileReportAction {
                target_type: *target_type,
                target_id: target_id.clone(),
                reason: reason.clone(),
            }),
            CommandPayload::ResolveReport { report_id } => {
                CommandAction::ResolveReport(ResolveReportAction {
                    report_id: report_id.clone(),
                })
            }
            CommandPayload::DismissReport { report_id } => {
                CommandAction::DismissReport(DismissReportAction {
                    report_id: report_id.clone(),
                })
            }
            CommandPayload::OpenTicket { subject, priority } => {
                CommandAction::OpenTicket(OpenTicketAction {
                    subject: subject.clone(),
                    priority: *priority,
                })
            }
            CommandPayload::AssignTicket {
                ticket_id,
                assignee,
            } => CommandAction::AssignTicket(AssignTicketAction {
                ticket_id: ticket_id.clone(),
                assignee: assignee.clone(),
            }),
            CommandPayload::ResolveTicket { ticket_id } => {
                CommandAction::ResolveTicket(ResolveTicketAction {
                    ticket_id: ticket_id.clone(),
                })
            }
            CommandPayload::CloseTicket { ticket_id } => {
                CommandAction::CloseTicket(CloseTicketAction {
                    ticket_id: ticket_id.clone(),
                })
            }
            CommandPayload::PostProject {
                title,
                budget_amount,
            } => CommandAction::PostProject(PostProjectAction {
                title: title.clone(),
                budget_amount: *budget_amount,
            }),
            CommandPayload::SubmitProposal {
                project_id,
                price,
                delivery_days,
            } => CommandAction::SubmitProposal(SubmitProposalAction {
                project_id: project_id.clone(),
                price: *price,
                delivery_days: *delivery_days,
            }),
            CommandPayload::AcceptProposal { proposal_id } => {
                CommandAction::AcceptProposal(AcceptProposalAction {
                    proposal_id: proposal_id.clone(),
                })
            }
            CommandPayload::RejectProposal { proposal_id } => {
                CommandAction::RejectProposal(RejectProposalAction {
                    proposal_id: proposal_id.clone(),
                })
            }
            CommandPayload::WithdrawProposal { proposal_id } => {
                CommandAction::WithdrawProposal(WithdrawProposalAction {
                    proposal_id: proposal_id.clone(),
                })
            }
            CommandPayload::SubmitReview {
                order_id,
                rating,
                comment,
            } => CommandAction::SubmitReview(SubmitReviewAction {
                order_id: order_id.clone(),
                rating: *rating,
                comment: comment.clone(),
            }),
            CommandPayload::ReplyReview { review_id, reply } => {
                CommandAction::ReplyReview(ReplyReviewAction {
                    review_id: review_id.clone(),
                    reply: reply.clone(),
                })
            }
            CommandPayload::HideReview { review_id } => {
                CommandAction::HideReview(HideReviewAction {
                    review_id: review_id.clone(),
                })
            }
            CommandPayload::CreateCoupon {
                code,
                kind,
                value,
                usage_limit,
                expires_at,
            } => CommandAction::CreateCoupon(CreateCouponAction {
                code: code.clone(),
                kind: *kind,
                value: *value,
                usage_limit: *usage_limit,
                expires_at: *expires_at,
            }),
            CommandPayload::DeactivateCoupon { code } => {
                CommandAction::DeactivateCoupon(DeactivateCouponAction { code: code.clone() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_with_coupon_locks_coupon_first() {
        let payload = CommandPayload::CreateOrder {
            seller_id: "seller-1".to_string(),
            service_id: "svc-1".to_string(),
            gross_amount: 100_000,
            coupon_code: Some("SAVE10".to_string()),
        };
        assert_eq!(
            write_kinds(&payload),
            vec![EntityKind::Coupon, EntityKind::Order]
        );
    }

    #[test]
    fn test_accept_proposal_spans_project_and_proposal() {
        let payload = CommandPayload::AcceptProposal {
            proposal_id: "prop-1".to_string(),
        };
        assert_eq!(
            write_kinds(&payload),
            vec![EntityKind::Project, EntityKind::Proposal]
        );
    }

    #[test]
    fn test_single_kind_commands() {
        let payload = CommandPayload::ApprovePayout {
            payout_id: "pay-1".to_string(),
        };
        assert_eq!(write_kinds(&payload), vec![EntityKind::Payout]);
    }
}
