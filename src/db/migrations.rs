use rusqlite::Connection;

use crate::error::HubtasksError;

pub fn run_migrations(conn: &Connection) -> Result<(), HubtasksError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS departments (
            id TEXT PRIMARY KEY,
            location_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            slug TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT 'assignment_turned_in',
            color TEXT NOT NULL DEFAULT '#8b5cf6',
            description TEXT,
            is_enabled INTEGER NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (location_id, slug)
        );

        CREATE TABLE IF NOT EXISTS areas (
            id TEXT PRIMARY KEY,
            location_id INTEGER NOT NULL,
            parent_id TEXT REFERENCES areas(id) ON DELETE SET NULL,
            level INTEGER NOT NULL DEFAULT 0,
            name TEXT NOT NULL,
            area_type TEXT,
            full_path TEXT NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0,
            is_enabled INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (location_id, name)
        );

        CREATE TABLE IF NOT EXISTS recurring_patterns (
            id TEXT PRIMARY KEY,
            location_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            interval_type TEXT NOT NULL
                CHECK (interval_type IN ('fixed', 'dynamic')),
            interval_days INTEGER NOT NULL CHECK (interval_days > 0),
            lead_time_days INTEGER NOT NULL DEFAULT 0 CHECK (lead_time_days >= 0),
            is_enabled INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (location_id, name)
        );

        CREATE TABLE IF NOT EXISTS task_states (
            id TEXT PRIMARY KEY,
            location_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            slug TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '#6b7280',
            role TEXT CHECK (role IN ('pending', 'due', 'overdue', 'complete')),
            is_complete_state INTEGER NOT NULL DEFAULT 0,
            checklist_started_state INTEGER NOT NULL DEFAULT 0,
            is_enabled INTEGER NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0,
            UNIQUE (location_id, slug)
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            location_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            recurrence_type TEXT NOT NULL DEFAULT 'none'
                CHECK (recurrence_type IN ('none', 'fixed', 'dynamic')),
            pattern_id TEXT REFERENCES recurring_patterns(id),
            department_id TEXT REFERENCES departments(id),
            area_id TEXT REFERENCES areas(id),
            checklist_items TEXT NOT NULL DEFAULT '[]',
            reference_photos TEXT NOT NULL DEFAULT '[]',
            require_completion_photo INTEGER NOT NULL DEFAULT 0,
            completion_reminder TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_by TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS task_instances (
            id TEXT PRIMARY KEY,
            task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            location_id INTEGER NOT NULL,
            scheduled_date TEXT NOT NULL,
            due_date TEXT NOT NULL,
            status_id TEXT NOT NULL REFERENCES task_states(id),
            checklist_state TEXT NOT NULL DEFAULT '{}',
            completed_by TEXT,
            completed_at TEXT,
            completion_photos TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (task_id, scheduled_date)
        );

        CREATE TABLE IF NOT EXISTS checklist_templates (
            id TEXT PRIMARY KEY,
            location_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            checklist_items TEXT NOT NULL DEFAULT '[]',
            created_by TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (location_id, name)
        );

        CREATE TABLE IF NOT EXISTS task_notes (
            id TEXT PRIMARY KEY,
            instance_id TEXT NOT NULL REFERENCES task_instances(id) ON DELETE CASCADE,
            text TEXT NOT NULL,
            photos TEXT NOT NULL DEFAULT '[]',
            carry_forward INTEGER NOT NULL DEFAULT 1,
            created_by TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_states_role ON task_states(location_id, role)
            WHERE role IS NOT NULL AND is_enabled = 1;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_states_checklist_started ON task_states(location_id)
            WHERE checklist_started_state = 1 AND is_enabled = 1;
        CREATE INDEX IF NOT EXISTS idx_tasks_location ON tasks(location_id, is_active);
        CREATE INDEX IF NOT EXISTS idx_instances_task_due ON task_instances(task_id, due_date);
        CREATE INDEX IF NOT EXISTS idx_instances_location_due ON task_instances(location_id, due_date);
        CREATE INDEX IF NOT EXISTS idx_instances_status ON task_instances(status_id);
        CREATE INDEX IF NOT EXISTS idx_notes_instance ON task_notes(instance_id);
        ",
    )?;
    Ok(())
}
