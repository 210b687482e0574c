use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use scrub_core::models::{
    InspectionSnapshot, InspectionStatus, MutationAction, MutationKind, MutationPayload,
    MutationRecord, MutationState, PhotoRecord, RoomSnapshot, RoomStatus, TaskItem,
};
use scrub_core::store::MutationStore;

use crate::cli::CompletionShell;
use crate::commands::common::{
    describe_record, format_queue_lines, format_relative_time, format_room_line,
    inspection_to_list_item, normalize_identifier, open_queue, open_service, record_to_list_item,
    require_api_url, resolve_api_url, resolve_data_dir, resolve_inspection, resolve_room_id,
    resolve_task_id,
};
use crate::commands::completions::run_completions;
use crate::commands::photo::{run_photo_add, run_photo_delete};
use crate::commands::queue::run_queue_drop;
use crate::commands::room::{run_room_complete, run_room_note};
use crate::commands::start::run_start;
use crate::commands::sync::run_sync;
use crate::commands::task::{run_task_add, run_task_set_done};
use crate::error::CliError;

#[test]
fn normalize_identifier_rejects_empty() {
    assert!(matches!(
        normalize_identifier(" \n "),
        Err(CliError::EmptyIdentifier)
    ));
    assert_eq!(
        normalize_identifier("  abc123  ").unwrap(),
        "abc123".to_string()
    );
}

#[test]
fn resolve_data_dir_prefers_explicit_path() {
    let explicit = PathBuf::from("/tmp/scrub-explicit");
    assert_eq!(resolve_data_dir(Some(explicit.clone())), explicit);
}

#[test]
fn resolve_api_url_trims_and_drops_blank_values() {
    assert_eq!(
        resolve_api_url(Some("  https://api.example.com  ".to_string())).as_deref(),
        Some("https://api.example.com")
    );
    assert_eq!(resolve_api_url(Some("   ".to_string())), None);
}

#[test]
fn require_api_url_rejects_blank_configuration() {
    assert!(matches!(
        require_api_url(Some("   ".to_string())),
        Err(CliError::ApiNotConfigured)
    ));
    assert_eq!(
        require_api_url(Some("https://api.example.com".to_string())).unwrap(),
        "https://api.example.com"
    );
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 180_000, now), "3m ago");
    assert_eq!(format_relative_time(now - 5 * 60 * 60_000, now), "5h ago");
    assert_eq!(format_relative_time(now - 3 * 24 * 60 * 60_000, now), "3d ago");
}

#[test]
fn describe_record_summarizes_each_payload() {
    let inspection = InspectionSnapshot::new("Seaside Villa", None);
    let create = MutationRecord::new(
        MutationAction::Create,
        MutationPayload::Inspection {
            inspection: inspection.clone(),
        },
    );
    assert_eq!(describe_record(&create), "Seaside Villa");

    let mut room = RoomSnapshot::new("Kitchen");
    room.tasks.push(TaskItem::new("Degrease the stove top"));
    let update = MutationRecord::new(
        MutationAction::Update,
        MutationPayload::Room {
            inspection_id: inspection.id.clone(),
            room,
        },
    );
    assert_eq!(describe_record(&update), "Kitchen (1 tasks)");

    let upload = MutationRecord::new(
        MutationAction::Create,
        MutationPayload::PhotoUpload {
            inspection_id: inspection.id.clone(),
            room_id: "room-1".to_string(),
            photo: PhotoRecord::new("data:image/jpeg;base64,AA==", "hallway.jpg"),
        },
    );
    assert_eq!(describe_record(&upload), "hallway.jpg");

    let delete = MutationRecord::new(
        MutationAction::Delete,
        MutationPayload::PhotoDelete {
            inspection_id: inspection.id,
            room_id: "room-1".to_string(),
            photo_id: "0198ab12-3456-7000-8000-000000000000".to_string(),
        },
    );
    assert_eq!(describe_record(&delete), "photo 0198ab12-3456");
}

#[test]
fn format_queue_lines_show_state_and_retry_budget() {
    let mut record = MutationRecord::new(
        MutationAction::Create,
        MutationPayload::Inspection {
            inspection: InspectionSnapshot::new("Seaside Villa", None),
        },
    );
    record.state = MutationState::Failed;
    record.retry_count = 2;

    let lines = format_queue_lines(&[record]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("INSPECTION CREATE"));
    assert!(lines[0].contains("FAILED"));
    assert!(lines[0].contains("Seaside Villa"));
    assert!(lines[0].contains("retry 2/3"));
}

#[test]
fn record_to_list_item_captures_queue_fields() {
    let mut record = record_with_id("dddddddd-dddd-7ddd-8ddd-111111111111", 5_000);
    record.state = MutationState::Failed;
    record.retry_count = 1;

    let item = record_to_list_item(&record);
    assert_eq!(item.id, "dddddddd-dddd-7ddd-8ddd-111111111111");
    assert_eq!(item.kind, "INSPECTION");
    assert_eq!(item.action, "CREATE");
    assert_eq!(item.state, "FAILED");
    assert_eq!(item.retry_count, 1);
    assert_eq!(item.enqueued_at, 5_000);
    assert_eq!(item.summary, "Seaside Villa");
}

#[test]
fn format_room_line_marks_ready_and_completed_rooms() {
    let mut room = RoomSnapshot::new("Bathroom 1");
    let mut task = TaskItem::new("Descale the shower head");
    task.completed = true;
    room.tasks.push(task);
    room.photos
        .push(PhotoRecord::new("data:image/jpeg;base64,AA==", "a.jpg"));
    assert!(!format_room_line(&room).contains("ready"));

    room.photos
        .push(PhotoRecord::new("data:image/jpeg;base64,AA==", "b.jpg"));
    assert!(format_room_line(&room).ends_with("ready"));

    room.status = RoomStatus::Completed;
    assert!(format_room_line(&room).ends_with("completed"));
}

#[test]
fn inspection_to_list_item_counts_completed_rooms() {
    let mut inspection = InspectionSnapshot::new("Seaside Villa", Some("prop-9".to_string()));
    let mut done = RoomSnapshot::new("Kitchen");
    done.status = RoomStatus::Completed;
    inspection.rooms.push(done);
    inspection.rooms.push(RoomSnapshot::new("Bathroom 1"));
    inspection.status = InspectionStatus::PendingSync;

    let item = inspection_to_list_item(&inspection);
    assert_eq!(item.rooms_completed, 1);
    assert_eq!(item.rooms_total, 2);
    assert_eq!(item.status, "PENDING_SYNC");
    assert_eq!(item.property_id.as_deref(), Some("prop-9"));
}

#[test]
fn run_start_caches_inspection_and_queues_create() {
    let data_dir = unique_test_data_dir();

    run_start(
        "Seaside Villa",
        Some("prop-1".to_string()),
        &["Kitchen".to_string(), "Bathroom 1".to_string()],
        &data_dir,
    )
    .unwrap();

    let service = open_service(&data_dir).unwrap();
    let inspections = service.list_inspections();
    assert_eq!(inspections.len(), 1);
    assert_eq!(inspections[0].property_name, "Seaside Villa");
    assert_eq!(inspections[0].rooms.len(), 2);

    let queue = open_queue(&data_dir).unwrap();
    let records = queue.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, MutationKind::Inspection);
    assert_eq!(records[0].action, MutationAction::Create);

    cleanup_data_dir(&data_dir);
}

#[test]
fn run_queue_drop_removes_by_unique_prefix() {
    let data_dir = unique_test_data_dir();
    let keep_id = "aaaaaaaa-aaaa-7aaa-8aaa-111111111111";
    let drop_id = "aaaaaaaa-aaaa-7aaa-8aaa-222222222222";
    {
        let queue = open_queue(&data_dir).unwrap();
        queue.enqueue(record_with_id(keep_id, 1_000));
        queue.enqueue(record_with_id(drop_id, 2_000));
    }

    run_queue_drop("aaaaaaaa-aaaa-7aaa-8aaa-2", &data_dir).unwrap();

    let queue = open_queue(&data_dir).unwrap();
    let remaining = queue.list();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id.as_str(), keep_id);

    cleanup_data_dir(&data_dir);
}

#[test]
fn run_queue_drop_rejects_ambiguous_prefix() {
    let data_dir = unique_test_data_dir();
    {
        let queue = open_queue(&data_dir).unwrap();
        queue.enqueue(record_with_id("aaaaaaaa-aaaa-7aaa-8aaa-111111111111", 1_000));
        queue.enqueue(record_with_id("aaaaaaaa-aaaa-7aaa-8aaa-222222222222", 2_000));
    }

    let error = run_queue_drop("aaaaaaaa-aaaa-7aaa-8aaa", &data_dir).unwrap_err();
    assert!(matches!(error, CliError::AmbiguousId(_)));

    let queue = open_queue(&data_dir).unwrap();
    assert_eq!(queue.list().len(), 2);

    cleanup_data_dir(&data_dir);
}

#[test]
fn run_queue_drop_rejects_missing_record() {
    let data_dir = unique_test_data_dir();

    let error = run_queue_drop("does-not-exist", &data_dir).unwrap_err();
    assert!(matches!(error, CliError::MutationNotFound(_)));

    cleanup_data_dir(&data_dir);
}

#[test]
fn resolve_inspection_supports_exact_and_prefix_id() {
    let data_dir = unique_test_data_dir();
    let service = open_service(&data_dir).unwrap();
    service.save_inspection(inspection_with_id(
        "bbbbbbbb-bbbb-7bbb-8bbb-111111111111",
        "Seaside Villa",
    ));
    service.save_inspection(inspection_with_id(
        "bbbbbbbb-bbbb-7bbb-8bbb-222222222222",
        "Hilltop Cabin",
    ));

    let by_exact = resolve_inspection(&service, "bbbbbbbb-bbbb-7bbb-8bbb-111111111111").unwrap();
    assert_eq!(by_exact.property_name, "Seaside Villa");

    let by_prefix = resolve_inspection(&service, "bbbbbbbb-bbbb-7bbb-8bbb-2").unwrap();
    assert_eq!(by_prefix.property_name, "Hilltop Cabin");

    let error = resolve_inspection(&service, "bbbbbbbb-bbbb-7bbb-8bbb").unwrap_err();
    assert!(matches!(error, CliError::AmbiguousId(_)));

    cleanup_data_dir(&data_dir);
}

#[test]
fn resolve_inspection_rejects_missing_id() {
    let data_dir = unique_test_data_dir();
    let service = open_service(&data_dir).unwrap();

    let error = resolve_inspection(&service, "does-not-exist").unwrap_err();
    assert!(matches!(error, CliError::InspectionNotFound(_)));

    cleanup_data_dir(&data_dir);
}

#[test]
fn resolve_room_id_matches_name_case_insensitive() {
    let mut inspection = InspectionSnapshot::new("Seaside Villa", None);
    inspection.rooms.push(RoomSnapshot::new("Kitchen"));
    inspection.rooms.push(RoomSnapshot::new("Bathroom 1"));
    let kitchen_id = inspection.rooms[0].room_id.clone();

    assert_eq!(resolve_room_id(&inspection, "kitchen").unwrap(), kitchen_id);
    assert_eq!(
        resolve_room_id(&inspection, &kitchen_id).unwrap(),
        kitchen_id
    );

    let error = resolve_room_id(&inspection, "Garage").unwrap_err();
    assert!(matches!(error, CliError::RoomNotFound(_)));
}

#[test]
fn resolve_task_id_by_prefix() {
    let mut room = RoomSnapshot::new("Kitchen");
    let mut first = TaskItem::new("Degrease the stove top");
    first.id = "task-aaaa".to_string();
    let mut second = TaskItem::new("Mop the floor");
    second.id = "task-bbbb".to_string();
    room.tasks.push(first);
    room.tasks.push(second);

    assert_eq!(resolve_task_id(&room, "task-b").unwrap(), "task-bbbb");
    assert_eq!(resolve_task_id(&room, "task-aaaa").unwrap(), "task-aaaa");

    assert!(matches!(
        resolve_task_id(&room, "task"),
        Err(CliError::AmbiguousId(_))
    ));
    assert!(matches!(
        resolve_task_id(&room, "missing"),
        Err(CliError::TaskNotFound(_))
    ));
}

#[test]
fn run_task_add_rejects_blank_description() {
    let data_dir = unique_test_data_dir();

    let error = run_task_add("whatever", "Kitchen", &["  ".to_string()], &data_dir).unwrap_err();
    assert!(matches!(error, CliError::EmptyDescription));

    cleanup_data_dir(&data_dir);
}

#[test]
fn run_task_add_and_done_update_the_checklist() {
    let data_dir = unique_test_data_dir();
    let inspection_id = {
        let service = open_service(&data_dir).unwrap();
        service
            .start_inspection("Seaside Villa", None, &["Kitchen".to_string()])
            .unwrap()
            .id
    };

    run_task_add(
        &inspection_id,
        "kitchen",
        &[
            "Degrease".to_string(),
            "the".to_string(),
            "stove".to_string(),
        ],
        &data_dir,
    )
    .unwrap();

    let task_id = {
        let service = open_service(&data_dir).unwrap();
        let stored = service.get_inspection(&inspection_id).unwrap();
        assert_eq!(stored.rooms[0].tasks.len(), 1);
        assert_eq!(stored.rooms[0].tasks[0].description, "Degrease the stove");
        assert!(!stored.rooms[0].tasks[0].completed);
        stored.rooms[0].tasks[0].id.clone()
    };

    run_task_set_done(&inspection_id, "Kitchen", &task_id, true, &data_dir).unwrap();

    let service = open_service(&data_dir).unwrap();
    let stored = service.get_inspection(&inspection_id).unwrap();
    assert!(stored.rooms[0].tasks[0].completed);

    cleanup_data_dir(&data_dir);
}

#[test]
fn run_room_note_sets_and_clears_notes() {
    let data_dir = unique_test_data_dir();
    let inspection_id = {
        let service = open_service(&data_dir).unwrap();
        service
            .start_inspection("Seaside Villa", None, &["Kitchen".to_string()])
            .unwrap()
            .id
    };

    run_room_note(
        &inspection_id,
        "Kitchen",
        &[
            "Grease".to_string(),
            "behind".to_string(),
            "the".to_string(),
            "hob".to_string(),
        ],
        &data_dir,
    )
    .unwrap();
    let service = open_service(&data_dir).unwrap();
    let stored = service.get_inspection(&inspection_id).unwrap();
    assert_eq!(stored.rooms[0].notes.as_deref(), Some("Grease behind the hob"));

    run_room_note(&inspection_id, "Kitchen", &[], &data_dir).unwrap();
    let service = open_service(&data_dir).unwrap();
    let stored = service.get_inspection(&inspection_id).unwrap();
    assert_eq!(stored.rooms[0].notes, None);

    cleanup_data_dir(&data_dir);
}

#[test]
fn run_room_complete_enforces_readiness() {
    let data_dir = unique_test_data_dir();
    let (inspection_id, room_id) = {
        let service = open_service(&data_dir).unwrap();
        let inspection = service
            .start_inspection("Seaside Villa", None, &["Kitchen".to_string()])
            .unwrap();
        let room_id = inspection.rooms[0].room_id.clone();
        let task = service
            .add_task(&inspection.id, &room_id, "Degrease the stove top")
            .unwrap();
        service
            .set_task_done(&inspection.id, &room_id, &task.id, true)
            .unwrap();
        (inspection.id, room_id)
    };

    // Tasks done but not enough photo evidence yet
    let error = run_room_complete(&inspection_id, &room_id, &data_dir).unwrap_err();
    assert!(matches!(error, CliError::Core(_)));

    {
        let service = open_service(&data_dir).unwrap();
        service
            .save_photos(
                &inspection_id,
                &room_id,
                vec![photo_fixture("p1"), photo_fixture("p2")],
            )
            .unwrap();
    }

    run_room_complete(&inspection_id, &room_id, &data_dir).unwrap();

    let service = open_service(&data_dir).unwrap();
    let stored = service.get_inspection(&inspection_id).unwrap();
    assert_eq!(stored.rooms[0].status, RoomStatus::Completed);
    assert_eq!(stored.status, InspectionStatus::Completed);

    cleanup_data_dir(&data_dir);
}

#[test]
fn run_photo_add_attaches_files_and_queues_uploads() {
    let data_dir = unique_test_data_dir();
    let inspection_id = {
        let service = open_service(&data_dir).unwrap();
        service
            .start_inspection("Seaside Villa", None, &["Kitchen".to_string()])
            .unwrap()
            .id
    };

    let front = data_dir.join("sink-front.jpg");
    let detail = data_dir.join("sink-detail.jpg");
    std::fs::write(&front, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    std::fs::write(&detail, [0xFF, 0xD8, 0xFF, 0xE1]).unwrap();

    run_photo_add(&inspection_id, "Kitchen", &[front, detail], &data_dir).unwrap();

    let service = open_service(&data_dir).unwrap();
    let stored = service.get_inspection(&inspection_id).unwrap();
    assert_eq!(stored.rooms[0].photos.len(), 2);
    assert_eq!(stored.rooms[0].photos[0].file_name, "sink-front.jpg");
    assert!(stored.rooms[0].photos[0]
        .data_url
        .starts_with("data:image/jpeg;base64,"));

    let queue = open_queue(&data_dir).unwrap();
    let uploads: Vec<MutationRecord> = queue
        .list()
        .into_iter()
        .filter(|record| record.kind == MutationKind::Photo)
        .collect();
    assert_eq!(uploads.len(), 2);
    assert!(uploads
        .iter()
        .all(|record| record.action == MutationAction::Create));

    cleanup_data_dir(&data_dir);
}

#[test]
fn run_photo_delete_queues_remote_delete() {
    let data_dir = unique_test_data_dir();
    let (inspection_id, room_id) = {
        let service = open_service(&data_dir).unwrap();
        let inspection = service
            .start_inspection("Seaside Villa", None, &["Kitchen".to_string()])
            .unwrap();
        let room_id = inspection.rooms[0].room_id.clone();
        service
            .save_photos(
                &inspection.id,
                &room_id,
                vec![photo_fixture("cccccccc-cccc-7ccc-8ccc-111111111111")],
            )
            .unwrap();
        (inspection.id, room_id)
    };

    run_photo_delete(&inspection_id, &room_id, "cccccccc-cccc", &data_dir).unwrap();

    let service = open_service(&data_dir).unwrap();
    let stored = service.get_inspection(&inspection_id).unwrap();
    assert!(stored.rooms[0].photos.is_empty());

    let queue = open_queue(&data_dir).unwrap();
    let last = queue.list().pop().unwrap();
    assert_eq!(last.kind, MutationKind::Photo);
    assert_eq!(last.action, MutationAction::Delete);

    cleanup_data_dir(&data_dir);
}

#[tokio::test(flavor = "current_thread")]
async fn run_sync_fails_cleanly_when_offline() {
    let data_dir = unique_test_data_dir();

    let error = run_sync("http://127.0.0.1:9", &data_dir).await.unwrap_err();
    assert!(matches!(error, CliError::Offline));

    cleanup_data_dir(&data_dir);
}

#[test]
fn run_completions_writes_bash_script_file() {
    let output_path = std::env::temp_dir().join(format!(
        "scrub-completions-test-{}.bash",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_nanos())
    ));

    run_completions(CompletionShell::Bash, Some(&output_path)).unwrap();

    let script = std::fs::read_to_string(&output_path).unwrap();
    assert!(script.contains("_scrub()"));
    assert!(script.contains("complete -F _scrub"));

    let _ = std::fs::remove_file(output_path);
}

fn record_with_id(id: &str, enqueued_at: i64) -> MutationRecord {
    let mut record = MutationRecord::new(
        MutationAction::Create,
        MutationPayload::Inspection {
            inspection: InspectionSnapshot::new("Seaside Villa", None),
        },
    );
    record.id = id.parse().unwrap();
    record.enqueued_at = enqueued_at;
    record
}

fn inspection_with_id(id: &str, property_name: &str) -> InspectionSnapshot {
    let mut inspection = InspectionSnapshot::new(property_name, None);
    inspection.id = id.to_string();
    inspection
}

fn photo_fixture(id: &str) -> PhotoRecord {
    let mut photo = PhotoRecord::new("data:image/jpeg;base64,AA==", "evidence.jpg");
    photo.id = id.to_string();
    photo
}

fn unique_test_data_dir() -> PathBuf {
    static NEXT_TEST_DIR_ID: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    let sequence = NEXT_TEST_DIR_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("scrub-cli-test-{timestamp}-{sequence}"))
}

fn cleanup_data_dir(path: &Path) {
    let _ = std::fs::remove_dir_all(path);
}
