//! Maintenance operations behind the `todo-admin` binary.

use todo_core::{NewTodo, StoreError, TodoService};

/// Insert the two sample todos. Returns how many were created.
pub fn seed(service: &TodoService) -> Result<usize, StoreError> {
    let samples = [
        NewTodo::new("Sample A"),
        NewTodo {
            title: "Sample B".to_string(),
            description: Some("desc".to_string()),
            completed: true,
        },
    ];
    let count = samples.len();
    for sample in samples {
        service.create_todo(sample)?;
    }
    Ok(count)
}

/// Delete every todo. Returns how many were removed.
pub fn cleanup(service: &TodoService) -> Result<usize, StoreError> {
    let mut deleted = 0;
    for todo in service.list_todos()? {
        if service.delete_todo(&todo.id)? {
            deleted += 1;
        }
    }
    Ok(deleted)
}
