//! Demo types used by the lab.
//!
//! These are the classes the serialization exercises revolve around: a movie,
//! a list of movies, a bank account with transient secrets, and a team of
//! employees that point at a shared manager.

use objstream_engine::{
    FieldDescriptor, FieldKind, Object, ObjectGraph, ObjectId, SchemaRegistry, TypeDescriptor,
    Value,
};

pub const MOVIE: &str = "Movie";
pub const CATALOG: &str = "Catalog";
pub const BANK_ACCOUNT: &str = "BankAccount";
pub const EMPLOYEE: &str = "Employee";
pub const TEAM: &str = "Team";

/// Registry holding every demo type at version 1.
pub fn demo_registry() -> objstream_engine::error::Result<SchemaRegistry> {
    SchemaRegistry::new()
        .with_type(TypeDescriptor::new(
            MOVIE,
            1,
            vec![
                FieldDescriptor::included("title", FieldKind::String),
                FieldDescriptor::included("director", FieldKind::String),
                FieldDescriptor::included("year", FieldKind::Int64),
                FieldDescriptor::included("rating", FieldKind::Float64),
            ],
        ))?
        .with_type(TypeDescriptor::new(
            CATALOG,
            1,
            vec![FieldDescriptor::included("movies", FieldKind::ObjectRefList)],
        ))?
        .with_type(TypeDescriptor::new(
            BANK_ACCOUNT,
            1,
            vec![
                FieldDescriptor::included("accountNumber", FieldKind::String),
                FieldDescriptor::included("accountHolder", FieldKind::String),
                FieldDescriptor::included("balance", FieldKind::Float64),
                FieldDescriptor::excluded("pin", FieldKind::String),
                FieldDescriptor::excluded("lastAccessTime", FieldKind::Float64),
            ],
        ))?
        .with_type(TypeDescriptor::new(
            EMPLOYEE,
            1,
            vec![
                FieldDescriptor::included("name", FieldKind::String),
                FieldDescriptor::included("salary", FieldKind::Float64),
                FieldDescriptor::included("manager", FieldKind::ObjectRef),
            ],
        ))?
        .with_type(TypeDescriptor::new(
            TEAM,
            1,
            vec![
                FieldDescriptor::included("name", FieldKind::String),
                FieldDescriptor::included("members", FieldKind::ObjectRefList),
            ],
        ))
}

pub fn movie(title: &str, director: &str, year: i64, rating: f64) -> Object {
    Object::new(MOVIE)
        .with("title", title)
        .with("director", director)
        .with("year", year)
        .with("rating", rating)
}

pub fn catalog(movies: Vec<ObjectId>) -> Object {
    Object::new(CATALOG).with("movies", movies)
}

pub fn bank_account(
    number: &str,
    holder: &str,
    balance: f64,
    pin: &str,
    last_access_time: f64,
) -> Object {
    Object::new(BANK_ACCOUNT)
        .with("accountNumber", number)
        .with("accountHolder", holder)
        .with("balance", balance)
        .with("pin", pin)
        .with("lastAccessTime", last_access_time)
}

pub fn employee(name: &str, salary: f64, manager: Option<ObjectId>) -> Object {
    Object::new(EMPLOYEE)
        .with("name", name)
        .with("salary", salary)
        .with("manager", manager)
}

pub fn team(name: &str, members: Vec<ObjectId>) -> Object {
    Object::new(TEAM).with("name", name).with("members", members)
}

/// One-line rendering of an object, fields in declared order.
///
/// References print as arena handles so shared and cyclic objects stay finite.
pub fn describe(registry: &SchemaRegistry, graph: &ObjectGraph, id: ObjectId) -> String {
    let Some(object) = graph.get(id) else {
        return format!("<missing {}>", id);
    };

    let names: Vec<&str> = match registry.get(&object.type_id) {
        Some(descriptor) => descriptor.fields.iter().map(|f| f.name.as_str()).collect(),
        None => object.fields.keys().map(String::as_str).collect(),
    };

    let fields: Vec<String> = names
        .into_iter()
        .map(|name| match object.get(name) {
            Some(value) => format!("{}={}", name, render(value)),
            None => format!("{}=<unset>", name),
        })
        .collect();

    format!("{}{}{{{}}}", object.type_id, id, fields.join(", "))
}

fn render(value: &Value) -> String {
    match value {
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        Value::Bool(v) => v.to_string(),
        Value::String(v) => format!("'{}'", v),
        Value::ObjectRef(Some(target)) => target.to_string(),
        Value::ObjectRef(None) => "null".to_string(),
        Value::ObjectRefList(targets) => {
            let items: Vec<String> = targets.iter().map(ToString::to_string).collect();
            format!("[{}]", items.join(", "))
        }
    }
}
