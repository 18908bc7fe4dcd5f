use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::workflows::employees::domain::{
    Dependent, EmployeeDocument, EmployeeId, EmployeeStatus, HistoryEventId, SanctionKind,
};
use crate::workflows::employees::repository::{
    EmployeeRepository, RecordRepository, RepositoryError,
};
use crate::workflows::employees::{
    EmployeeService, EmployeeServiceError, HighlightPolicy, HistoryEntryRequest, StatusDetails,
    StatusRequest, ValidationError, BASE_POINTS,
};

fn entry(kind: &str) -> HistoryEntryRequest {
    HistoryEntryRequest {
        kind: kind.to_string(),
        date: Some(today()),
        description: "Registro de ocorrência".to_string(),
    }
}

#[test]
fn create_starts_active_with_base_points() {
    let (service, repository, _) = build_service();

    let created = service
        .create(new_employee("  Ana Souza "))
        .expect("employee created");

    assert_eq!(created.name, "Ana Souza");
    assert_eq!(created.status, EmployeeStatus::Active);
    assert_eq!(created.points, BASE_POINTS);
    assert!(repository
        .fetch(&created.id)
        .expect("fetch succeeds")
        .is_some());
}

#[test]
fn create_rejects_blank_and_duplicate_names() {
    let (service, _, _) = build_service();
    service
        .create(new_employee("Ana Souza"))
        .expect("first insert");

    match service.create(new_employee("ana souza")) {
        Err(EmployeeServiceError::Validation(ValidationError::DuplicateName(name))) => {
            assert_eq!(name, "ana souza")
        }
        other => panic!("expected duplicate name, got {other:?}"),
    }
    assert!(matches!(
        service.create(new_employee("   ")),
        Err(EmployeeServiceError::Validation(ValidationError::MissingField("name")))
    ));
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service();
    assert!(matches!(
        service.get(&EmployeeId("missing".to_string())),
        Err(EmployeeServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn repository_failures_surface_unchanged() {
    let service = EmployeeService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryAlerts::default()),
        HighlightPolicy::default(),
    );

    match service.search(None) {
        Err(EmployeeServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline")
        }
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}

#[test]
fn search_matches_name_or_tax_id() {
    let (service, repository, _) = build_service();
    let mut bruno = employee("emp-b");
    bruno.name = "Bruno Lima".to_string();
    bruno.tax_id = "111.222.333-44".to_string();
    let mut carla = employee("emp-c");
    carla.name = "Carla Dias".to_string();
    carla.tax_id = "555.666.777-88".to_string();
    repository.seed(carla);
    repository.seed(bruno);

    let by_name = service.search(Some("  bruno ")).expect("search succeeds");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].employee.name, "Bruno Lima");

    let by_tax_id = service.search(Some("555.666")).expect("search succeeds");
    assert_eq!(by_tax_id[0].employee.name, "Carla Dias");

    let everyone = service.search(None).expect("search succeeds");
    let names: Vec<_> = everyone.iter().map(|view| view.employee.name.as_str()).collect();
    assert_eq!(names, vec!["Bruno Lima", "Carla Dias"]);
}

#[test]
fn tax_id_search_ignores_case() {
    let (service, repository, _) = build_service();
    let mut dora = employee("emp-d");
    dora.name = "Dora Alves".to_string();
    dora.tax_id = "RNE-AB1234".to_string();
    repository.seed(dora);

    let found = service.search(Some("ab12")).expect("search succeeds");

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].employee.name, "Dora Alves");
}

#[test]
fn ratings_outside_the_scale_are_rejected() {
    let (service, repository, _) = build_service();
    repository.seed(employee("emp-a"));

    match service.add_evaluation(evaluation("emp-a", Some(i32::MAX))) {
        Err(EmployeeServiceError::Validation(ValidationError::OutOfRange {
            field, value, ..
        })) => {
            assert_eq!(field, "evaluation score");
            assert_eq!(value, i64::from(i32::MAX));
        }
        other => panic!("expected out of range, got {other:?}"),
    }
    assert!(matches!(
        service.add_inspection(inspection("emp-a", Some(-1))),
        Err(EmployeeServiceError::Validation(ValidationError::OutOfRange { .. }))
    ));
    service
        .add_evaluation(evaluation("emp-a", Some(100)))
        .expect("top of the scale is accepted");
    assert_eq!(repository.all_records().expect("records").evaluations.len(), 1);
}

#[test]
fn profile_recomputes_score_separately_from_points() {
    let (service, repository, _) = build_service();
    let mut ana = employee("emp-a");
    ana.points = 42;
    repository.seed(ana);
    service
        .add_evaluation(evaluation("emp-a", Some(87)))
        .expect("evaluation stored");
    service
        .add_sanction(sanction("emp-a", SanctionKind::Warning))
        .expect("sanction stored");

    let profile = service
        .profile(&EmployeeId("emp-a".to_string()))
        .expect("profile loads");

    assert_eq!(profile.employee.points, 42);
    assert_eq!(profile.score.total, 10 + 8 - 10);
    assert_eq!(profile.status_label, "Ativo");
    assert!(!profile.alert_due);
}

#[test]
fn records_for_unknown_employee_are_rejected() {
    let (service, _, _) = build_service();
    assert!(matches!(
        service.add_inspection(inspection("ghost", Some(90))),
        Err(EmployeeServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn history_moves_points_and_reversal_rereads_balance() {
    let (service, repository, _) = build_service();
    let mut ana = employee("emp-a");
    ana.points = 3;
    repository.seed(ana);
    let id = EmployeeId("emp-a".to_string());

    let negative = service
        .record_history(&id, entry("negativo"))
        .expect("negative recorded");
    assert_eq!(negative.point_delta, -10);
    assert_eq!(negative.points, 0);

    let removed = service
        .remove_history(&negative.event.id)
        .expect("negative removed");
    assert_eq!(removed.point_delta, 10);
    assert_eq!(removed.points, 10);
    assert_eq!(repository.history_count(), 0);
}

#[test]
fn removing_positive_from_zero_stays_at_zero() {
    let (service, repository, _) = build_service();
    repository.seed(employee("emp-a"));
    let id = EmployeeId("emp-a".to_string());

    let positive = service
        .record_history(&id, entry("positivo"))
        .expect("positive recorded");
    assert_eq!(positive.points, 15);

    let mut drained = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("employee present");
    drained.points = 0;
    repository.update(drained).expect("update succeeds");

    let removed = service
        .remove_history(&positive.event.id)
        .expect("positive removed");
    assert_eq!(removed.points, 0);
}

#[test]
fn neutral_history_leaves_points_untouched() {
    let (service, repository, _) = build_service();
    repository.seed(employee("emp-a"));

    let outcome = service
        .record_history(&EmployeeId("emp-a".to_string()), entry("neutro"))
        .expect("neutral recorded");

    assert_eq!(outcome.point_delta, 0);
    assert_eq!(outcome.points, 10);
    assert_eq!(repository.history_count(), 1);
}

#[test]
fn monthly_limit_blocks_fifth_rated_entry() {
    let (service, repository, _) = build_service();
    repository.seed(employee("emp-a"));
    let id = EmployeeId("emp-a".to_string());

    for _ in 0..4 {
        service
            .record_history(&id, entry("positivo"))
            .expect("within limit");
    }

    assert!(matches!(
        service.record_history(&id, entry("negativo")),
        Err(EmployeeServiceError::Validation(
            ValidationError::MonthlyLimitReached { .. }
        ))
    ));
    service
        .record_history(&id, entry("neutro"))
        .expect("neutral still accepted");
    assert_eq!(repository.history_count(), 5);
}

#[test]
fn removing_unknown_history_is_not_found() {
    let (service, _, _) = build_service();
    assert!(matches!(
        service.remove_history(&HistoryEventId("hist-missing".to_string())),
        Err(EmployeeServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn change_status_persists_transition() {
    let (service, repository, _) = build_service();
    repository.seed(employee("emp-a"));
    let id = EmployeeId("emp-a".to_string());

    let updated = service
        .change_status(
            &id,
            StatusRequest {
                target: EmployeeStatus::NoticePeriod,
                details: StatusDetails::Deadline {
                    deadline: today() + Duration::days(20),
                },
            },
        )
        .expect("status changed");

    let stored = repository
        .fetch(&id)
        .expect("fetch succeeds")
        .expect("employee present");
    assert_eq!(stored, updated);
    assert_eq!(stored.status, EmployeeStatus::NoticePeriod);
}

#[test]
fn change_status_refuses_ineligible_highlight() {
    let (service, repository, _) = build_service();
    repository.seed(with_status("emp-a", EmployeeStatus::Highlighted));
    repository.seed(with_status("emp-b", EmployeeStatus::Highlighted));
    repository.seed(employee("emp-c"));
    for score in [Some(100), Some(100)] {
        service
            .add_evaluation(evaluation("emp-c", score))
            .expect("evaluation stored");
    }

    let result = service.change_status(
        &EmployeeId("emp-c".to_string()),
        StatusRequest {
            target: EmployeeStatus::Highlighted,
            details: StatusDetails::None,
        },
    );

    match result {
        Err(EmployeeServiceError::Validation(ValidationError::NotEligible(reason))) => {
            assert!(reason.contains("simultaneous"))
        }
        other => panic!("expected ineligible highlight, got {other:?}"),
    }
}

#[test]
fn change_status_highlights_eligible_employee() {
    let (service, repository, _) = build_service();
    repository.seed(employee("emp-c"));
    service
        .add_evaluation(evaluation("emp-c", Some(100)))
        .expect("evaluation stored");
    service
        .add_inspection(inspection("emp-c", Some(100)))
        .expect("inspection stored");

    let updated = service
        .change_status(
            &EmployeeId("emp-c".to_string()),
            StatusRequest {
                target: EmployeeStatus::Highlighted,
                details: StatusDetails::None,
            },
        )
        .expect("eligible employee highlighted");

    assert_eq!(updated.status, EmployeeStatus::Highlighted);
    assert_eq!(updated.highlight.streak, 1);
    assert_eq!(updated.deadline, Some(today() + Duration::days(30)));
}

#[test]
fn due_alerts_cover_temporary_statuses_only() {
    let (service, repository, alerts) = build_service();
    let mut vacation = with_status("emp-a", EmployeeStatus::OnVacation);
    vacation.deadline = Some(today() + Duration::days(3));
    let mut probation = with_status("emp-b", EmployeeStatus::Probation);
    probation.deadline = Some(today() + Duration::days(6));
    let mut highlighted = with_status("emp-c", EmployeeStatus::Highlighted);
    highlighted.deadline = Some(today() + Duration::days(2));
    repository.seed(vacation);
    repository.seed(probation);
    repository.seed(highlighted);

    let due = service.due_alerts().expect("alerts computed");
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].employee_id, EmployeeId("emp-a".to_string()));
    assert_eq!(due[0].days_remaining, 3);
    assert_eq!(due[0].template, "status_deadline_approaching");
    assert_eq!(
        due[0].details.get("department").map(String::as_str),
        Some("Operações")
    );

    assert_eq!(service.dispatch_alerts().expect("dispatch succeeds"), 1);
    assert_eq!(alerts.events(), due);
}

#[test]
fn delete_cascades_child_collections() {
    let (service, repository, _) = build_service();
    repository.seed(employee("emp-a"));
    let id = EmployeeId("emp-a".to_string());
    service
        .record_history(&id, entry("positivo"))
        .expect("history recorded");
    service
        .add_dependent(Dependent {
            employee_id: id.clone(),
            name: "Lucas".to_string(),
            kinship: "Filho".to_string(),
            birth_date: Some(date(2015, 3, 2)),
            tax_id: None,
        })
        .expect("dependent stored");
    service
        .add_document(EmployeeDocument {
            employee_id: id.clone(),
            title: "Contrato".to_string(),
            category: "admissional".to_string(),
            file_reference: Some("docs/emp-a/contrato.pdf".to_string()),
        })
        .expect("document stored");
    assert_eq!(service.dependents(&id).expect("dependents listed").len(), 1);
    assert_eq!(service.documents(&id).expect("documents listed").len(), 1);

    service.delete(&id).expect("employee deleted");

    assert_eq!(repository.history_count(), 0);
    assert!(repository.dependents(&id).expect("listing works").is_empty());
    assert!(repository.documents(&id).expect("listing works").is_empty());
    assert!(matches!(
        service.delete(&id),
        Err(EmployeeServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn blank_dependent_name_is_rejected() {
    let (service, repository, _) = build_service();
    repository.seed(employee("emp-a"));

    let result = service.add_dependent(Dependent {
        employee_id: EmployeeId("emp-a".to_string()),
        name: " ".to_string(),
        kinship: "Filha".to_string(),
        birth_date: None,
        tax_id: None,
    });

    assert!(matches!(
        result,
        Err(EmployeeServiceError::Validation(ValidationError::MissingField(
            "dependent name"
        )))
    ));
}
