use crate::errors::StoreError;
use crate::models::{AppData, NewTask, Subtask, Task, TaskPriority, TaskStatus};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

impl AppData {
    pub fn task(&self, task_id: &str) -> Result<&Task, StoreError> {
        self.tasks
            .iter()
            .find(|task| task.id == task_id)
            .ok_or_else(|| StoreError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    fn task_mut(&mut self, task_id: &str) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| StoreError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    pub fn add_task(&mut self, request: NewTask, today: NaiveDate) -> Result<Task, StoreError> {
        let title = non_empty(&request.title)?;
        let status = match request.status.as_deref() {
            Some(raw) => raw.parse::<TaskStatus>()?,
            None => TaskStatus::default(),
        };
        let priority = match request.priority.as_deref() {
            Some(raw) => raw.parse::<TaskPriority>()?,
            None => TaskPriority::default(),
        };

        let mut task = Task::new(new_id(), title);
        task.status = status;
        task.priority = priority;
        task.estimated_time = request.estimated_time;
        task.created_at = Some(Utc::now());
        if task.is_completed() {
            task.completed_at = Some(today);
        }

        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Removes the task together with every subtask it owns.
    pub fn delete_task(&mut self, task_id: &str) -> Result<Task, StoreError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or_else(|| StoreError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;
        Ok(self.tasks.remove(index))
    }

    pub fn set_task_status(
        &mut self,
        task_id: &str,
        status: TaskStatus,
        today: NaiveDate,
    ) -> Result<Task, StoreError> {
        let task = self.task_mut(task_id)?;
        if status == TaskStatus::Completed {
            if task.status != TaskStatus::Completed || task.completed_at.is_none() {
                task.completed_at = Some(today);
            }
        } else {
            task.completed_at = None;
        }
        task.status = status;
        Ok(task.clone())
    }

    pub fn log_time(&mut self, task_id: &str, seconds: u64) -> Result<Task, StoreError> {
        let task = self.task_mut(task_id)?;
        task.time_spent = Some(task.time_spent_secs().saturating_add(seconds));
        Ok(task.clone())
    }

    pub fn add_subtask(&mut self, task_id: &str, title: &str) -> Result<Subtask, StoreError> {
        let title = non_empty(title)?;
        let task = self.task_mut(task_id)?;
        let subtask = Subtask {
            id: new_id(),
            title,
            is_completed: false,
        };
        task.subtasks.push(subtask.clone());
        Ok(subtask)
    }

    pub fn toggle_subtask_status(
        &mut self,
        task_id: &str,
        subtask_id: &str,
    ) -> Result<Subtask, StoreError> {
        let task = self.task_mut(task_id)?;
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|sub| sub.id == subtask_id)
            .ok_or_else(|| StoreError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            })?;
        subtask.is_completed = !subtask.is_completed;
        Ok(subtask.clone())
    }

    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<Subtask, StoreError> {
        let task = self.task_mut(task_id)?;
        let index = task
            .subtasks
            .iter()
            .position(|sub| sub.id == subtask_id)
            .ok_or_else(|| StoreError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            })?;
        Ok(task.subtasks.remove(index))
    }
}

fn non_empty(title: &str) -> Result<String, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::EmptyTitle);
    }
    Ok(title.to_string())
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
