//! Project and proposal command handlers
//!
//! Accepting a proposal is the one command that writes two kinds: the
//! proposal flips to Accepted and the project to InProgress in the same
//! commit. At most one proposal per project ever reaches Accepted.

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::validator::ensure_owner;
use crate::validator::transitions::{
    ensure_project_transition, ensure_proposal_transition, ensure_role,
};
use shared::models::{EntityKind, Project, ProjectStatus, Proposal, ProposalStatus};
use shared::util::{new_id, now_millis};
use shared::{AppError, AppResult, ErrorCode, EventType, LifecycleEvent, Role};

/// PostProject action
#[derive(Debug, Clone)]
pub struct PostProjectAction {
    pub title: String,
    pub budget_amount: i64,
}

impl CommandHandler for PostProjectAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Buyer, "POST_PROJECT")?;

        let project = Project {
            id: new_id(),
            client_id: meta.actor_id.clone(),
            title: self.title.clone(),
            budget_amount: self.budget_amount,
            status: ProjectStatus::Open,
            created_at: now_millis(),
        };

        let event = LifecycleEvent::created(
            EventType::ProjectPosted,
            EntityKind::Project,
            project.id.clone(),
            project.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_project(project)?;
        Ok(vec![event])
    }
}

/// SubmitProposal action
#[derive(Debug, Clone)]
pub struct SubmitProposalAction {
    pub project_id: String,
    pub price: i64,
    pub delivery_days: u32,
}

impl CommandHandler for SubmitProposalAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Seller, "SUBMIT_PROPOSAL")?;

        let project = ctx.project(&self.project_id)?;
        if project.status != ProjectStatus::Open {
            return Err(AppError::conflict(
                ErrorCode::ProjectAlreadyAssigned,
                format!("Project {} is no longer open for proposals", project.id),
            ));
        }

        let proposal = Proposal {
            id: new_id(),
            project_id: project.id,
            expert_id: meta.actor_id.clone(),
            price: self.price,
            delivery_days: self.delivery_days,
            status: ProposalStatus::Sent,
            created_at: now_millis(),
        };

        let event = LifecycleEvent::created(
            EventType::ProposalSubmitted,
            EntityKind::Proposal,
            proposal.id.clone(),
            proposal.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_proposal(proposal)?;
        Ok(vec![event])
    }
}

/// AcceptProposal action
#[derive(Debug, Clone)]
pub struct AcceptProposalAction {
    pub proposal_id: String,
}

impl CommandHandler for AcceptProposalAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Buyer, "ACCEPT_PROPOSAL")?;
        let mut proposal = ctx.proposal(&self.proposal_id)?;
        let mut project = ctx.project(&proposal.project_id)?;
        ensure_owner(&meta.actor_id, &project.client_id, "project's owner")?;
        ensure_proposal_transition(proposal.status, ProposalStatus::Accepted)?;

        // Only one proposal per project may reach Accepted
        let already_assigned = ctx
            .proposals()?
            .iter()
            .any(|p| p.project_id == project.id && p.status == ProposalStatus::Accepted);
        if already_assigned {
            return Err(AppError::conflict(
                ErrorCode::ProjectAlreadyAssigned,
                format!("Project {} already has an accepted proposal", project.id),
            ));
        }
        ensure_project_transition(project.status, ProjectStatus::InProgress)?;

        let proposal_previous = proposal.status;
        proposal.status = ProposalStatus::Accepted;
        let project_previous = project.status;
        project.status = ProjectStatus::InProgress;

        let events = vec![
            LifecycleEvent::transition(
                EventType::ProposalAccepted,
                EntityKind::Proposal,
                proposal.id.clone(),
                proposal_previous.as_str(),
                proposal.status.as_str(),
                meta.actor_id.clone(),
                meta.command_id.clone(),
            ),
            LifecycleEvent::transition(
                EventType::ProjectAssigned,
                EntityKind::Project,
                project.id.clone(),
                project_previous.as_str(),
                project.status.as_str(),
                meta.actor_id.clone(),
                meta.command_id.clone(),
            ),
        ];
        ctx.put_proposal(proposal)?;
        ctx.put_project(project)?;
        Ok(events)
    }
}

/// RejectProposal action
#[derive(Debug, Clone)]
pub struct RejectProposalAction {
    pub proposal_id: String,
}

impl CommandHandler for RejectProposalAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Buyer, "REJECT_PROPOSAL")?;
        let mut proposal = ctx.proposal(&self.proposal_id)?;
        let project = ctx.project(&proposal.project_id)?;
        ensure_owner(&meta.actor_id, &project.client_id, "project's owner")?;
        ensure_proposal_transition(proposal.status, ProposalStatus::Rejected)?;

        let previous = proposal.status;
        proposal.status = ProposalStatus::Rejected;

        let event = LifecycleEvent::transition(
            EventType::ProposalRejected,
            EntityKind::Proposal,
            proposal.id.clone(),
            previous.as_str(),
            proposal.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_proposal(proposal)?;
        Ok(vec![event])
    }
}

/// WithdrawProposal action
#[derive(Debug, Clone)]
pub struct WithdrawProposalAction {
    pub proposal_id: String,
}

impl CommandHandler for WithdrawProposalAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_role(meta.role, Role::Seller, "WITHDRAW_PROPOSAL")?;
        let mut proposal = ctx.proposal(&self.proposal_id)?;
        ensure_owner(&meta.actor_id, &proposal.expert_id, "proposal's owner")?;
        ensure_proposal_transition(proposal.status, ProposalStatus::Withdrawn)?;

        let previous = proposal.status;
        proposal.status = ProposalStatus::Withdrawn;

        let event = LifecycleEvent::transition(
            EventType::ProposalWithdrawn,
            EntityKind::Proposal,
            proposal.id.clone(),
            previous.as_str(),
            proposal.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_proposal(proposal)?;
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::store::LedgerStore;

    fn test_meta(actor: &str, role: Role) -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: actor.to_string(),
            role,
            timestamp: 1_700_000_000_000,
        }
    }

    fn post_project(ctx: &mut CommandContext<'_>, client: &str) -> Project {
        let events = PostProjectAction {
            title: "Logo redesign".to_string(),
            budget_amount: 900_000,
        }
        .execute(ctx, &test_meta(client, Role::Buyer))
        .unwrap();
        ctx.project(&events[0].entity_id).unwrap()
    }

    fn submit_proposal(
        ctx: &mut CommandContext<'_>,
        project_id: &str,
        expert: &str,
    ) -> Proposal {
        let events = SubmitProposalAction {
            project_id: project_id.to_string(),
            price: 800_000,
            delivery_days: 7,
        }
        .execute(ctx, &test_meta(expert, Role::Seller))
        .unwrap();
        ctx.proposal(&events[0].entity_id).unwrap()
    }

    #[test]
    fn test_accept_flips_proposal_and_project() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let project = post_project(&mut ctx, "client-1");
        let proposal = submit_proposal(&mut ctx, &project.id, "expert-1");

        let events = AcceptProposalAction {
            proposal_id: proposal.id.clone(),
        }
        .execute(&mut ctx, &test_meta("client-1", Role::Buyer))
        .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::ProposalAccepted);
        assert_eq!(events[1].event_type, EventType::ProjectAssigned);

        assert_eq!(
            ctx.proposal(&proposal.id).unwrap().status,
            ProposalStatus::Accepted
        );
        assert_eq!(
            ctx.project(&project.id).unwrap().status,
            ProjectStatus::InProgress
        );
    }

    #[test]
    fn test_second_accept_conflicts_and_leaves_proposal_sent() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let project = post_project(&mut ctx, "client-1");
        let first = submit_proposal(&mut ctx, &project.id, "expert-1");
        let second = submit_proposal(&mut ctx, &project.id, "expert-2");

        AcceptProposalAction {
            proposal_id: first.id.clone(),
        }
        .execute(&mut ctx, &test_meta("client-1", Role::Buyer))
        .unwrap();

        let err = AcceptProposalAction {
            proposal_id: second.id.clone(),
        }
        .execute(&mut ctx, &test_meta("client-1", Role::Buyer))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProjectAlreadyAssigned);
        assert_eq!(
            ctx.proposal(&second.id).unwrap().status,
            ProposalStatus::Sent
        );
    }

    #[test]
    fn test_submit_on_assigned_project_conflicts() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let project = post_project(&mut ctx, "client-1");
        let proposal = submit_proposal(&mut ctx, &project.id, "expert-1");
        AcceptProposalAction {
            proposal_id: proposal.id,
        }
        .execute(&mut ctx, &test_meta("client-1", Role::Buyer))
        .unwrap();

        let err = SubmitProposalAction {
            project_id: project.id,
            price: 700_000,
            delivery_days: 5,
        }
        .execute(&mut ctx, &test_meta("expert-2", Role::Seller))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProjectAlreadyAssigned);
    }

    #[test]
    fn test_only_project_owner_accepts() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let project = post_project(&mut ctx, "client-1");
        let proposal = submit_proposal(&mut ctx, &project.id, "expert-1");

        let err = AcceptProposalAction {
            proposal_id: proposal.id,
        }
        .execute(&mut ctx, &test_meta("client-2", Role::Buyer))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotOwner);
    }

    #[test]
    fn test_withdraw_is_owner_only_and_terminal() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let project = post_project(&mut ctx, "client-1");
        let proposal = submit_proposal(&mut ctx, &project.id, "expert-1");

        let err = WithdrawProposalAction {
            proposal_id: proposal.id.clone(),
        }
        .execute(&mut ctx, &test_meta("expert-2", Role::Seller))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotOwner);

        WithdrawProposalAction {
            proposal_id: proposal.id.clone(),
        }
        .execute(&mut ctx, &test_meta("expert-1", Role::Seller))
        .unwrap();

        // Withdrawn is terminal; the owner cannot accept it back
        let err = AcceptProposalAction {
            proposal_id: proposal.id,
        }
        .execute(&mut ctx, &test_meta("client-1", Role::Buyer))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::TerminalState);
    }

    #[test]
    fn test_reject_keeps_project_open() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let project = post_project(&mut ctx, "client-1");
        let proposal = submit_proposal(&mut ctx, &project.id, "expert-1");

        RejectProposalAction {
            proposal_id: proposal.id,
        }
        .execute(&mut ctx, &test_meta("client-1", Role::Buyer))
        .unwrap();

        assert_eq!(ctx.project(&project.id).unwrap().status, ProjectStatus::Open);
        // A new proposal can still come in
        submit_proposal(&mut ctx, &project.id, "expert-2");
    }
}
