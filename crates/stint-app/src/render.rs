use stint_core::task::Task;
use unicode_width::UnicodeWidthStr;

/// Width-aligned task table: id, name, day, priority, tags.
pub fn task_table(tasks: &[Task]) -> String {
    let header: [String; 5] =
        ["ID", "NAME", "DAY", "PRI", "TAGS"].map(|column| column.to_string());
    let rows: Vec<[String; 5]> = tasks
        .iter()
        .map(|task| {
            [
                task.id.to_string(),
                task.task_name.clone(),
                task.selected_day.as_str().to_string(),
                task.selected_priority.as_str().to_string(),
                task.tags.join(", "),
            ]
        })
        .collect();

    let mut widths = [0_usize; 5];
    for (width, cell) in widths.iter_mut().zip(header.iter()) {
        *width = cell.width();
    }
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

/// One task in full, one field per line.
pub fn task_details(task: &Task) -> String {
    let mut out = String::new();
    out.push_str(&format!("Id:          {}\n", task.id));
    out.push_str(&format!("Name:        {}\n", task.task_name));
    out.push_str(&format!("Description: {}\n", task.description));
    out.push_str(&format!("Day:         {}\n", task.selected_day.as_str()));
    out.push_str(&format!(
        "Priority:    {}\n",
        task.selected_priority.as_str()
    ));
    if !task.tags.is_empty() {
        out.push_str(&format!("Tags:        {}\n", task.tags.join(", ")));
    }
    out.push_str(&format!("Avatar:      {}\n", task.avatar_url()));
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let mut first = true;
    for (cell, width) in cells.iter().zip(widths.iter()) {
        if !first {
            out.push_str("  ");
        }
        first = false;
        out.push_str(cell);
        for _ in cell.width()..*width {
            out.push(' ');
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}
