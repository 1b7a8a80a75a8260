use crate::error::Result;
use crate::{io, paths};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocsOutcome {
    Created { path: PathBuf },
    AlreadyPresent { dir: PathBuf },
}

/// Write the workflow guide to `<docs_dir>/README.md`.
///
/// Only the directory is checked: if it already exists nothing is written,
/// even when the README inside is missing or edited.
pub fn generate_workflow_guide(docs_dir: &Path) -> Result<DocsOutcome> {
    if docs_dir.exists() {
        return Ok(DocsOutcome::AlreadyPresent {
            dir: docs_dir.to_path_buf(),
        });
    }

    io::ensure_dir(docs_dir)?;
    let path = paths::readme_path(docs_dir);
    io::atomic_write(&path, WORKFLOW_GUIDE.as_bytes())?;
    tracing::debug!(path = %path.display(), "wrote workflow guide");
    Ok(DocsOutcome::Created { path })
}

pub const WORKFLOW_GUIDE: &str = r#"# 🤖 Agent Workflow Guide

This document describes the standard development flow with the installed agents.
Planning runs as a sequence of gated steps so every decision is written down;
execution is iterative, one task at a time.

---

## 1. 🏗️ Project Spec (@Project Architect)
**Role:** The Visionary.
**Goal:** Turn a rough idea into a concrete specification with explicit project principles.
- **Command:** `/dev:project "I want a Todo App that..."`
- **Output:** `docs/project.md`

## 2. 🧱 Requirements Engineering (@Requirements Engineer)
**Role:** The Tech Lead.
**Goal:** Lock down the stack, database, and libraries the spec implies.
- **Command:** `/dev:requirements`
- **Output:** `docs/requirements.md` (the technical contract)

## 3. 🗺️ Roadmap Strategy (@Milestone Manager)
**Role:** The Strategist.
**Goal:** Slice the project into sequential delivery milestones (e.g. "M1: Auth", "M2: Dashboard").
- **Command:** `/dev:milestone`
- **Output:** `docs/milestones.md`

## 4. 📋 Task Planning (@Task Planner)
**Role:** The Manager.
**Goal:** Break one milestone into small, developer-ready tasks.
- **Command:** `/dev:tasks <Milestone_ID>`
- **Output:** `docs/task.md`

## 5. 🕵️ Blueprint Audit (@Auditor)
**Role:** The Gatekeeper.
**Goal:** Check the tasks against the requirements before any code is written.
- **Command:** `/dev:auditor`
- **Output:** `audit_report.md`

## 6. 💻 Implementation (@Coder)
**Role:** The Builder.
**Goal:** Execute one task at a time from `task.md`, with tests, logging progress as it goes.
- **Safeguards:** Checks for `.gitignore` and follows `requirements.md` strictly.
- **Command:** `/dev:coder <Task_ID>`
- **Buffer:** `work_log.md`

## 7. ⚖️ Quality Assurance (@QA Engineer)
**Role:** The Inspector.
**Goal:** Verify the implementation against the requirement artifacts using `work_log.md`.
- **Command:** `/dev:review <Task_ID>`
- **Output:** `docs/logs/review_log.md`

## 8. 📦 Release Management (@Release Manager)
**Role:** The Historian.
**Goal:** Fold the temporary `work_log.md` into a permanent `changelog.md`.
- **Command:** `/dev:log`
- **Output:** `changelog.md`

---

## 🛠️ On-Demand Utilities

### Infrastructure (@DevOps Engineer)
**Role:** The Mechanic.
**Goal:** Handle Docker, CI/CD, and linter configuration so the Coder stays on business logic.
- **Command:** `/dev:ops`
"#;
