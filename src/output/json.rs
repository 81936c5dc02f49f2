use serde_json::{json, Value};

use crate::error::HubtasksError;
use crate::models::{
    ChecklistState, ChecklistTemplate, InstanceView, RecurringPattern, Task, TaskInstance, TaskNote,
    TaskState,
};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &HubtasksError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_summary(t: &Task) -> Value {
    json!({
        "id": t.id,
        "name": t.name,
        "recurrence_type": t.recurrence_type.as_str(),
        "is_active": t.is_active
    })
}

pub fn task_detail(t: &Task, pattern: Option<&RecurringPattern>, future_instances: usize) -> Value {
    json!({
        "id": t.id,
        "location_id": t.location_id,
        "name": t.name,
        "description": t.description,
        "recurrence_type": t.recurrence_type.as_str(),
        "pattern": pattern.map(pattern_json),
        "department_id": t.department_id,
        "area_id": t.area_id,
        "checklist_items": t.checklist_items,
        "reference_photos": t.reference_photos,
        "require_completion_photo": t.require_completion_photo,
        "completion_reminder": t.completion_reminder,
        "is_active": t.is_active,
        "created_by": t.created_by,
        "created_at": t.created_at,
        "updated_at": t.updated_at,
        "future_instances": future_instances
    })
}

pub fn pattern_json(p: &RecurringPattern) -> Value {
    json!({
        "id": p.id,
        "name": p.name,
        "interval_type": p.interval_type.as_str(),
        "interval_days": p.interval_days,
        "lead_time_days": p.lead_time_days,
        "is_enabled": p.is_enabled
    })
}

pub fn template_json(t: &ChecklistTemplate) -> Value {
    json!({
        "id": t.id,
        "name": t.name,
        "checklist_items": t.checklist_items,
        "created_by": t.created_by,
        "created_at": t.created_at,
        "updated_at": t.updated_at
    })
}

pub fn state_json(s: &TaskState) -> Value {
    json!({
        "id": s.id,
        "name": s.name,
        "slug": s.slug,
        "color": s.color,
        "role": s.role.map(|r| r.as_str()),
        "is_complete_state": s.is_complete_state,
        "checklist_started_state": s.checklist_started_state,
        "is_enabled": s.is_enabled,
        "sort_order": s.sort_order
    })
}

pub fn instance_json(i: &TaskInstance) -> Value {
    json!({
        "id": i.id,
        "task_id": i.task_id,
        "scheduled_date": i.scheduled_date,
        "due_date": i.due_date,
        "status_id": i.status_id,
        "checklist_state": i.checklist_state,
        "completed_by": i.completed_by,
        "completed_at": i.completed_at,
        "completion_photos": i.completion_photos
    })
}

pub fn board_entry(v: &InstanceView, checklist_len: usize) -> Value {
    json!({
        "id": v.instance.id,
        "task_id": v.instance.task_id,
        "task_name": v.task_name,
        "due_date": v.instance.due_date,
        "status": v.state_slug,
        "status_name": v.state_name,
        "color": v.state_color,
        "is_complete": v.is_complete,
        "department": v.department_name,
        "area": v.area_path,
        "recurrence_type": v.recurrence_type,
        "checklist": { "checked": v.instance.checked_count(), "total": checklist_len }
    })
}

/// Checklist items paired with their checked flag.
pub fn checklist_json(items: &[String], state: &ChecklistState) -> Value {
    let entries: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(index, text)| {
            json!({
                "index": index,
                "text": text,
                "checked": state.get(&index).copied().unwrap_or(false)
            })
        })
        .collect();
    Value::Array(entries)
}

pub fn note_json(n: &TaskNote) -> Value {
    json!({
        "id": n.id,
        "instance_id": n.instance_id,
        "text": n.text,
        "photos": n.photos,
        "carry_forward": n.carry_forward,
        "created_by": n.created_by,
        "created_at": n.created_at
    })
}
