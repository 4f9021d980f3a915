//! Report command handlers

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::validator::transitions::{ensure_admin, ensure_report_transition};
use shared::models::{EntityKind, Report, ReportStatus, ReportTargetType};
use shared::util::{new_id, now_millis};
use shared::{AppResult, EventType, LifecycleEvent};

/// FileReport action - any user may report any target
#[derive(Debug, Clone)]
pub struct FileReportAction {
    pub target_type: ReportTargetType,
    pub target_id: String,
    pub reason: String,
}

impl CommandHandler for FileReportAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        let report = Report {
            id: new_id(),
            reported_type: self.target_type,
            target_id: self.target_id.clone(),
            reporter_id: meta.actor_id.clone(),
            reason: self.reason.clone(),
            status: ReportStatus::Open,
            created_at: now_millis(),
        };

        let event = LifecycleEvent::created(
            EventType::ReportFiled,
            EntityKind::Report,
            report.id.clone(),
            report.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_report(report)?;
        Ok(vec![event])
    }
}

/// ResolveReport action
#[derive(Debug, Clone)]
pub struct ResolveReportAction {
    pub report_id: String,
}

impl CommandHandler for ResolveReportAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "RESOLVE_REPORT")?;
        let mut report = ctx.report(&self.report_id)?;
        ensure_report_transition(report.status, ReportStatus::Resolved)?;

        let previous = report.status;
        report.status = ReportStatus::Resolved;

        let event = LifecycleEvent::transition(
            EventType::ReportResolved,
            EntityKind::Report,
            report.id.clone(),
            previous.as_str(),
            report.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_report(report)?;
        Ok(vec![event])
    }
}

/// DismissReport action
#[derive(Debug, Clone)]
pub struct DismissReportAction {
    pub report_id: String,
}

impl CommandHandler for DismissReportAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "DISMISS_REPORT")?;
        let mut report = ctx.report(&self.report_id)?;
        ensure_report_transition(report.status, ReportStatus::Dismissed)?;

        let previous = report.status;
        report.status = ReportStatus::Dismissed;

        let event = LifecycleEvent::transition(
            EventType::ReportDismissed,
            EntityKind::Report,
            report.id.clone(),
            previous.as_str(),
            report.status.as_str(),
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_report(report)?;
        Ok(vec![event])
    }
}
