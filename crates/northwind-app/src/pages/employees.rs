//! Employee list and detail.

use crate::models::{Employee, EmployeeDetail};
use crate::views::*;

pub fn render_list(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return message("No employees...");
    }

    let rows: Vec<String> = employees
        .iter()
        .map(|e| {
            [
                avatar_for(&e.initials()),
                cell("Name", &link(&format!("/employee/{}", e.id), &e.full_name())),
                text_cell("Title", &e.title),
                text_cell("City", &e.city),
                text_cell("Phone", &e.home_phone),
                text_cell("Country", &e.country),
            ]
            .concat()
        })
        .collect();

    table_card(
        "Employees",
        &["", "Name", "Title", "City", "Phone", "Country"],
        &rows,
    )
}

pub fn render_detail(detail: Option<&EmployeeDetail>) -> String {
    let Some(detail) = detail else {
        return message("Employee not found");
    };
    let e = &detail.employee;

    let mut right = vec![
        field("Postal Code", &e.postal_code),
        field("Country", &e.country),
        field("Home Phone", &e.home_phone),
        field("Extension", &e.extension),
        field("Notes", opt(&e.notes)),
    ];
    if let Some((id, name)) = detail.manager() {
        right.push(field_link("Reports To", &format!("/employee/{}", id), &name));
    }

    detail_card(
        "ballot",
        "Employee information",
        &[
            field("Name", &e.full_name()),
            field("Title", &e.title),
            field("Title Of Courtesy", &e.title_of_courtesy),
            field("Birth Date", &e.birth_date),
            field("Hire Date", &e.hire_date),
            field("Address", &e.address),
            field("City", &e.city),
        ],
        &right,
        &go_back("/employees"),
    )
}
