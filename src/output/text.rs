use crate::db::instance_repo::LocationSummary;
use crate::models::{ChecklistTemplate, InstanceView, RecurringPattern, Task, TaskNote, TaskState};
use crate::schedule::{BulkOutcome, SweepReport};

fn short(id: &str) -> &str {
    &id[..std::cmp::min(8, id.len())]
}

pub fn print_task(t: &Task, pattern: Option<&RecurringPattern>, future_instances: usize) {
    println!("Task: {} ({})", t.name, t.id);
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    match pattern {
        Some(p) => println!(
            "  Recurrence: {} ({}, every {} days)",
            t.recurrence_type.as_str(),
            p.name,
            p.interval_days
        ),
        None => println!("  Recurrence: {}", t.recurrence_type.as_str()),
    }
    println!("  Active: {}", if t.is_active { "yes" } else { "no" });
    if t.require_completion_photo {
        println!("  Completion photo required");
    }
    if let Some(ref reminder) = t.completion_reminder {
        println!("  Reminder: {reminder}");
    }
    if !t.checklist_items.is_empty() {
        println!("  Checklist:");
        for (i, item) in t.checklist_items.iter().enumerate() {
            println!("    {i}. {item}");
        }
    }
    println!("  Future instances: {future_instances}");
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        println!(
            "  {} [{}] {}{}",
            short(&t.id),
            t.recurrence_type.as_str(),
            t.name,
            if t.is_active { "" } else { " (inactive)" }
        );
    }
}

pub fn print_board(entries: &[InstanceView]) {
    if entries.is_empty() {
        println!("No task instances found.");
        return;
    }
    for v in entries {
        let place = match (&v.department_name, &v.area_path) {
            (Some(d), Some(a)) => format!(" - {d}, {a}"),
            (Some(d), None) => format!(" - {d}"),
            (None, Some(a)) => format!(" - {a}"),
            (None, None) => String::new(),
        };
        println!(
            "  {} {} [{}] {}{}",
            v.instance.due_date,
            short(&v.instance.id),
            v.state_slug,
            v.task_name,
            place
        );
    }
}

pub fn print_instance(v: &InstanceView, checklist: &[String]) {
    println!("Instance: {} ({})", v.task_name, v.instance.id);
    println!("  Due: {}", v.instance.due_date);
    println!("  Status: {}", v.state_name);
    if let Some(ref by) = v.instance.completed_by {
        println!("  Completed by: {by}");
    }
    if let Some(at) = v.instance.completed_at {
        println!("  Completed: {at}");
    }
    for photo in &v.instance.completion_photos {
        println!("  Photo: {photo}");
    }
    if !checklist.is_empty() {
        println!("  Checklist:");
        for (i, item) in checklist.iter().enumerate() {
            let checked = v.instance.checklist_state.get(&i).copied().unwrap_or(false);
            println!("    [{}] {i}. {item}", if checked { "x" } else { " " });
        }
    }
}

pub fn print_notes(notes: &[TaskNote]) {
    if notes.is_empty() {
        println!("No notes.");
        return;
    }
    for n in notes {
        let author = n.created_by.as_deref().unwrap_or("?");
        let carry = if n.carry_forward { " (carried forward)" } else { "" };
        println!("  {} @{}: {}{}", n.created_at, author, n.text, carry);
    }
}

pub fn print_states(states: &[TaskState]) {
    for s in states {
        let mut flags = Vec::new();
        if let Some(role) = s.role {
            flags.push(format!("role={}", role.as_str()));
        }
        if s.is_complete_state {
            flags.push("complete".to_string());
        }
        if s.checklist_started_state {
            flags.push("checklist-started".to_string());
        }
        if !s.is_enabled {
            flags.push("disabled".to_string());
        }
        println!("  {} - {} {} {}", s.slug, s.name, s.color, flags.join(" "));
    }
}

pub fn print_patterns(patterns: &[RecurringPattern]) {
    if patterns.is_empty() {
        println!("No recurring patterns.");
        return;
    }
    for p in patterns {
        println!(
            "  {} [{}] every {} days, lead {} days{}",
            p.name,
            p.interval_type.as_str(),
            p.interval_days,
            p.lead_time_days,
            if p.is_enabled { "" } else { " (disabled)" }
        );
    }
}

pub fn print_templates(templates: &[ChecklistTemplate]) {
    if templates.is_empty() {
        println!("No checklist templates.");
        return;
    }
    for t in templates {
        println!("  {} ({} items)", t.name, t.checklist_items.len());
    }
}

pub fn print_template(t: &ChecklistTemplate) {
    println!("Template: {}", t.name);
    for (i, item) in t.checklist_items.iter().enumerate() {
        println!("  {i}. {item}");
    }
}

pub fn print_bulk(action: &str, outcome: &BulkOutcome) {
    println!(
        "{action}: {} matched, {} applied, {} failed",
        outcome.matched, outcome.applied, outcome.failed
    );
}

pub fn print_sweep(report: &SweepReport) {
    println!("Sweep complete:");
    println!("  Promoted to due: {}", report.promoted_due);
    println!("  Promoted to overdue: {}", report.promoted_overdue);
    println!("  Generated: {}", report.generated);
    for skipped in &report.skipped {
        println!("  Skipped {} ({}): {}", skipped.task_name, short(&skipped.task_id), skipped.reason);
    }
}

pub fn print_summary(location_id: i64, summary: &LocationSummary, active_tasks: i64) {
    println!("Location {location_id}");
    println!("  Active tasks: {active_tasks}");
    println!("  Instances: {}", summary.total);
    for s in &summary.by_state {
        println!("    {}: {}", s.name, s.count);
    }
    println!("  Due today: {}", summary.due_today);
    println!("  Overdue: {}", summary.overdue);
}
