//! Action Tests
//!
//! Actions over an in-memory store: tenant scoping, default-column
//! protection and invalidation signals.

#[cfg(test)]
mod tests {
    use crate::actions::{self, ColumnUpdate};
    use crate::config::IdentityConfig;
    use crate::context::OrgContext;
    use crate::domain::{DomainError, LeadPatch, NewLead, SettingsPatch, ValueInput, ViewMode, PIPELINE_TEMPLATE};
    use crate::invalidation::CRM_ROUTE;
    use crate::repository::column::ColumnDeletion;
    use crate::repository::{init_db, Repository};
    use crate::AppState;
    use std::path::Path;

    async fn setup_state() -> AppState {
        let db_state = init_db(Path::new(":memory:")).await.expect("Failed to init test DB");
        AppState::new(db_state, &IdentityConfig::default())
    }

    fn form(name: &str, value: Option<&str>) -> NewLead {
        NewLead {
            name: name.to_string(),
            whatsapp: Some("+55 21 98888-7777".to_string()),
            value: value.map(|v| ValueInput::Text(v.to_string())),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_lead_blank_value_persists_null() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        actions::list_columns(&state, &ctx).await.unwrap();

        let lead = actions::create_lead(&state, &ctx, form("Blank", Some("  "))).await.unwrap();

        let stored = state.leads.find_by_id(ctx.org(), lead.id).await.unwrap().unwrap();
        assert_eq!(stored.value, None);
    }

    #[tokio::test]
    async fn test_create_lead_requires_whatsapp() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        actions::list_columns(&state, &ctx).await.unwrap();

        let mut no_phone = form("Quiet", None);
        no_phone.whatsapp = None;
        let result = actions::create_lead(&state, &ctx, no_phone).await;

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_create_lead_before_board_fails() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_new");

        let result = actions::create_lead(&state, &ctx, form("Early", None)).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_lead_keeps_notes() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        actions::list_columns(&state, &ctx).await.unwrap();
        let mut noted = form("Noted", None);
        noted.notes = Some("Call after 18h".to_string());
        let lead = actions::create_lead(&state, &ctx, noted).await.unwrap();

        let patch: LeadPatch = serde_json::from_str(r#"{"value": "50.00"}"#).unwrap();
        let updated = actions::update_lead(&state, &ctx, lead.id, patch).await.unwrap();

        assert_eq!(updated.notes.as_deref(), Some("Call after 18h"));
        assert_eq!(updated.value.map(|v| v.to_string()), Some("50.00".to_string()));
    }

    #[tokio::test]
    async fn test_mutations_signal_invalidation() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        actions::list_columns(&state, &ctx).await.unwrap();
        let mut rx = state.invalidation.subscribe();

        let lead = actions::create_lead(&state, &ctx, form("Signal", None)).await.unwrap();
        actions::delete_lead(&state, &ctx, lead.id).await.unwrap();

        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.path, CRM_ROUTE);
            assert_eq!(event.organization_id, "org_a");
        }
    }

    #[tokio::test]
    async fn test_default_column_cannot_be_deleted() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        let board = actions::list_columns(&state, &ctx).await.unwrap();

        let result = actions::delete_column(&state, &ctx, board[0].id).await;

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert!(state.columns.find_by_id(ctx.org(), board[0].id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_column_moves_leads_to_predecessor() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        let board = actions::list_columns(&state, &ctx).await.unwrap();
        let lead = actions::create_lead(&state, &ctx, form("Proposal", None)).await.unwrap();
        actions::update_lead_status(&state, &ctx, lead.id, board[2].id, 0).await.unwrap();

        let outcome = actions::delete_column(&state, &ctx, board[2].id).await.unwrap();

        assert_eq!(outcome, ColumnDeletion::Reassigned { fallback_id: board[1].id, moved: 1 });
        let stored = state.leads.find_by_id(ctx.org(), lead.id).await.unwrap().unwrap();
        assert_eq!(stored.column_id, Some(board[1].id));

        // Reading the board again brings the stage back.
        let healed = actions::list_columns(&state, &ctx).await.unwrap();
        assert_eq!(healed.len(), PIPELINE_TEMPLATE.len());
    }

    #[tokio::test]
    async fn test_delete_missing_column_is_noop() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        let mut rx = state.invalidation.subscribe();

        let outcome = actions::delete_column(&state, &ctx, 4242).await.unwrap();

        assert_eq!(outcome, ColumnDeletion::Absent);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_and_update_column() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");

        let column = actions::create_column(&state, &ctx, "  Reunião  ", Some("#ff0000".to_string()))
            .await
            .unwrap();
        assert_eq!(column.title, "Reunião");
        assert_eq!(column.order, PIPELINE_TEMPLATE.len() as i32);

        let update = ColumnUpdate {
            title: Some("Reunião marcada".to_string()),
            color: Some(String::new()),
        };
        let updated = actions::update_column(&state, &ctx, column.id, update).await.unwrap();
        assert_eq!(updated.title, "Reunião marcada");
        assert_eq!(updated.color, None);

        let board = actions::list_columns(&state, &ctx).await.unwrap();
        assert_eq!(board.last().map(|c| c.id), Some(column.id));

        assert!(matches!(
            actions::create_column(&state, &ctx, " ", None).await,
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_update_column_of_other_org() {
        let state = setup_state().await;
        let board = actions::list_columns(&state, &OrgContext::new("org_a")).await.unwrap();

        let result = actions::update_column(
            &state,
            &OrgContext::new("org_b"),
            board[1].id,
            ColumnUpdate {
                title: Some("Hijack".to_string()),
                color: None,
            },
        )
        .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_pipeline_summary_totals() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        let board = actions::list_columns(&state, &ctx).await.unwrap();
        actions::create_lead(&state, &ctx, form("One", Some("100"))).await.unwrap();
        let two = actions::create_lead(&state, &ctx, form("Two", Some("250.50"))).await.unwrap();
        actions::update_lead_status(&state, &ctx, two.id, board[4].id, 0).await.unwrap();

        let summary = actions::pipeline_summary(&state, &ctx).await.unwrap();

        assert_eq!(summary.total_leads, 2);
        assert_eq!(summary.total_value.to_string(), "350.50");
        assert_eq!(summary.columns[0].lead_count, 1);
        assert_eq!(summary.columns[4].total_value.to_string(), "250.50");
    }

    #[tokio::test]
    async fn test_list_leads_with_query() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        actions::list_columns(&state, &ctx).await.unwrap();
        actions::create_lead(&state, &ctx, form("João Silva", None)).await.unwrap();
        actions::create_lead(&state, &ctx, form("Ana Costa", None)).await.unwrap();

        let all = actions::list_leads(&state, &ctx, Some("  ")).await.unwrap();
        let found = actions::list_leads(&state, &ctx, Some("JOÃO")).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "João Silva");
    }

    #[tokio::test]
    async fn test_settings_roundtrip() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");

        let defaults = actions::get_settings(&state, &ctx).await.unwrap();
        assert_eq!(defaults.id, 0);
        assert_eq!(defaults.view_mode, ViewMode::Kanban);

        let patch = SettingsPatch {
            view_mode: Some(ViewMode::List),
            email: Some("arquivo@agencia.com".to_string()),
            ..Default::default()
        };
        actions::update_settings(&state, &ctx, patch).await.unwrap();

        let stored = actions::get_settings(&state, &ctx).await.unwrap();
        assert_eq!(stored.view_mode, ViewMode::List);
        assert_eq!(stored.email.as_deref(), Some("arquivo@agencia.com"));
    }

    #[tokio::test]
    async fn test_column_titles_are_unique() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        let board = actions::list_columns(&state, &ctx).await.unwrap();

        let result = actions::create_column(&state, &ctx, "Novos Leads", None).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        actions::create_column(&state, &ctx, "Reunião", None).await.unwrap();
        let result = actions::create_column(&state, &ctx, " REUNIÃO ", None).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        let rename = ColumnUpdate {
            title: Some(board[2].title.clone()),
            color: None,
        };
        let result = actions::update_column(&state, &ctx, board[1].id, rename).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        // Keeping its own title while recoloring is fine.
        let recolor = ColumnUpdate {
            title: Some(board[1].title.clone()),
            color: Some("#00aa00".to_string()),
        };
        let updated = actions::update_column(&state, &ctx, board[1].id, recolor).await.unwrap();
        assert_eq!(updated.color.as_deref(), Some("#00aa00"));

        let after = actions::list_columns(&state, &ctx).await.unwrap();
        assert_eq!(after.len(), PIPELINE_TEMPLATE.len() + 1);
    }

    #[tokio::test]
    async fn test_empty_patch_leaves_lead_untouched() {
        let state = setup_state().await;
        let ctx = OrgContext::new("org_a");
        actions::list_columns(&state, &ctx).await.unwrap();
        let lead = actions::create_lead(&state, &ctx, form("Still", Some("10"))).await.unwrap();
        let mut rx = state.invalidation.subscribe();

        let patch: LeadPatch = serde_json::from_str("{}").unwrap();
        let same = actions::update_lead(&state, &ctx, lead.id, patch).await.unwrap();

        assert_eq!(same, lead);
        assert!(rx.try_recv().is_err());

        let patch: LeadPatch = serde_json::from_str("{}").unwrap();
        let missing = actions::update_lead(&state, &ctx, 9999, patch).await;
        assert!(matches!(missing, Err(DomainError::NotFound(_))));
    }
}
