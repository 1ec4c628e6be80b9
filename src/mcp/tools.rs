use crate::config::Config;
use crate::db::{load_persons, Db};
use crate::error::{Result, KinmcpError};
use crate::graph::{classify, relatives_within, FamilyGraph};
use crate::i18n::{Locale, Message};
use crate::mcp::types::{Tool, ToolsCallResult};
use crate::person::Person;
use crate::resolve::{ResolutionReport, ResolveError, Resolver};
use crate::roster::{search_people, FamilyStats};
use serde::Deserialize;
use serde_json::{json, Value};

/// Get all tool definitions for tools/list
pub fn get_tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: "kinship_resolve".to_string(),
            description: "Describe how two family members are related: a named direct relation (father, grandchild, son-in-law, ...) or the shortest chain of parent/child/spouse links between them".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "person1": {
                        "type": "string",
                        "description": "Full name of the first person (or id when by_id is true)"
                    },
                    "person2": {
                        "type": "string",
                        "description": "Full name of the second person (or id when by_id is true)"
                    },
                    "by_id": {
                        "type": "boolean",
                        "default": false,
                        "description": "Treat person1/person2 as ids instead of full names"
                    },
                    "locale": {
                        "type": "string",
                        "enum": ["fa", "en"],
                        "description": "Label language. Defaults to the server locale."
                    }
                },
                "required": ["person1", "person2"]
            }),
        },
        Tool {
            name: "kinship_search_people".to_string(),
            description: "Find family members whose name contains the query (case-insensitive) or whose id contains it".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Name or id fragment. Empty lists everyone.",
                        "default": ""
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Maximum number of people to return"
                    }
                }
            }),
        },
        Tool {
            name: "kinship_stats".to_string(),
            description: "Head counts for the family: total, men, women and married members".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Tool {
            name: "kinship_relatives".to_string(),
            description: "List everyone within a few parent/child/spouse links of a person, nearest first, with the direct relation where one applies".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "person": {
                        "type": "string",
                        "description": "Full name of the person (or id when by_id is true)"
                    },
                    "by_id": {
                        "type": "boolean",
                        "default": false
                    },
                    "max_depth": {
                        "type": "integer",
                        "default": 2,
                        "minimum": 1,
                        "maximum": MAX_RELATIVES_DEPTH,
                        "description": "Maximum number of links to follow"
                    },
                    "locale": {
                        "type": "string",
                        "enum": ["fa", "en"]
                    }
                },
                "required": ["person"]
            }),
        },
    ]
}

const MAX_RELATIVES_DEPTH: usize = 4;

/// Build a fresh snapshot. Each call sees the collection as currently stored.
async fn load_graph(db: &Db) -> Result<FamilyGraph> {
    let persons = load_persons(db).await?;
    Ok(FamilyGraph::new(persons))
}

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: &Value, tool: &str) -> Result<T> {
    serde_json::from_value(arguments.clone())
        .map_err(|e| KinmcpError::InvalidInput(format!("Invalid {} params: {}", tool, e)))
}

fn locale_or_default(requested: Option<&str>, config: &Config) -> Result<Locale> {
    match requested {
        Some(locale) => locale
            .parse()
            .map_err(|_| KinmcpError::InvalidInput(format!("Unsupported locale '{}' (expected fa or en)", locale))),
        None => Ok(config.locale()),
    }
}

fn to_text(value: &impl serde::Serialize) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| KinmcpError::Config(format!("JSON serialization failed: {}", e)))
}

/// Resolve parameters
#[derive(Debug, Deserialize)]
struct ResolveParams {
    person1: String,
    person2: String,
    #[serde(default)]
    by_id: bool,
    locale: Option<String>,
}

/// Handle kinship_resolve tool
///
/// Resolution failures (unknown name, no connection) are reported as a tool
/// result with `isError`, not as JSON-RPC errors.
pub async fn handle_resolve(
    db: &Db,
    config: &Config,
    arguments: &Value,
) -> Result<ToolsCallResult> {
    let params: ResolveParams = parse_args(arguments, "kinship_resolve")?;
    let locale = locale_or_default(params.locale.as_deref(), config)?;

    let graph = load_graph(db).await?;
    let resolver = Resolver::new(&graph).with_locale(locale);
    let result = if params.by_id {
        resolver.resolve_ids(&params.person1, &params.person2)
    } else {
        resolver.resolve(&params.person1, &params.person2)
    };

    if let Err(e) = &result {
        log::info!("kinship_resolve {:?} / {:?}: {:?}", params.person1, params.person2, e.kind());
    }

    let report = ResolutionReport::from(result);
    let text = to_text(&report)?;
    Ok(match report {
        ResolutionReport::Error(_) => ToolsCallResult::error_text(text),
        _ => ToolsCallResult::text(text),
    })
}

/// Search parameters
#[derive(Debug, Deserialize)]
struct SearchPeopleParams {
    #[serde(default)]
    query: String,
    limit: Option<usize>,
}

/// Handle kinship_search_people tool
pub async fn handle_search_people(
    db: &Db,
    config: &Config,
    arguments: &Value,
) -> Result<ToolsCallResult> {
    let params: SearchPeopleParams = parse_args(arguments, "kinship_search_people")?;
    let limit = config.search_limit(params.limit);

    let graph = load_graph(db).await?;
    let people = search_people(&graph, &params.query, limit);

    let result_json = json!({
        "query": params.query,
        "count": people.len(),
        "total": graph.len(),
        "persons": people,
    });

    Ok(ToolsCallResult::text(to_text(&result_json)?))
}

/// Handle kinship_stats tool
pub async fn handle_stats(db: &Db) -> Result<ToolsCallResult> {
    let graph = load_graph(db).await?;
    let stats = FamilyStats::from_graph(&graph);
    Ok(ToolsCallResult::text(to_text(&stats)?))
}

/// Relatives parameters
#[derive(Debug, Deserialize)]
struct RelativesParams {
    person: String,
    #[serde(default)]
    by_id: bool,
    #[serde(default = "default_max_depth")]
    max_depth: usize,
    locale: Option<String>,
}

fn default_max_depth() -> usize { 2 }

/// Handle kinship_relatives tool (bounded breadth-first neighbourhood)
pub async fn handle_relatives(
    db: &Db,
    config: &Config,
    arguments: &Value,
) -> Result<ToolsCallResult> {
    let params: RelativesParams = parse_args(arguments, "kinship_relatives")?;
    let locale = locale_or_default(params.locale.as_deref(), config)?;
    let max_depth = params.max_depth.clamp(1, MAX_RELATIVES_DEPTH);

    let graph = load_graph(db).await?;
    let found = if params.by_id {
        graph.person(&params.person)
    } else {
        graph.find_by_name(&params.person)
    };
    let Some(center) = found else {
        let err = ResolveError::Lookup {
            query: params.person,
            message: locale.message(Message::PersonNotFound).to_string(),
        };
        return Ok(ToolsCallResult::error_text(err.to_string()));
    };

    let relatives: Vec<Value> = relatives_within(&graph, &center.id, max_depth)
        .into_iter()
        .filter_map(|(id, depth)| graph.person(&id).map(|p| (p, depth)))
        .map(|(relative, depth)| relative_json(&graph, relative, center, depth, locale))
        .collect();

    let result_json = json!({
        "person": { "id": center.id, "name": center.full_name },
        "max_depth": max_depth,
        "count": relatives.len(),
        "relatives": relatives,
    });

    Ok(ToolsCallResult::text(to_text(&result_json)?))
}

fn relative_json(graph: &FamilyGraph, relative: &Person, center: &Person, depth: usize, locale: Locale) -> Value {
    let relation = classify(relative, center, graph);
    json!({
        "id": relative.id,
        "name": relative.full_name,
        "depth": depth,
        "relation": relation.map(|kind| locale.relation(kind)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::import_persons;
    use crate::person::{Gender, PersonRecord};
    use tempfile::TempDir;

    async fn family_db() -> (TempDir, Db, Config) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("family.db");
        let db = Db::new(&db_path);
        db.migrate()
            .await
            .unwrap();

        let persons = vec![
            Person::new("1", "حسن کریمی", Gender::Male).with_spouse("2"),
            Person::new("2", "مریم کریمی", Gender::Female),
            Person::new("3", "علی کریمی", Gender::Male).with_father("1").with_mother("2"),
            Person::new("4", "رضا کریمی", Gender::Male).with_father("3"),
            Person::new("5", "Stranger", Gender::Female),
            Person::new("6", "سارا احمدی", Gender::Female).with_spouse("4"),
        ];
        import_persons(&db, persons.into_iter().map(PersonRecord::from).collect())
            .await
            .unwrap();

        let config = Config::from_toml(&format!(
            "[kinmcp]\ndb_path = \"{}\"\n[search]\ndefault_limit = 2\n",
            db_path.display()
        ))
        .unwrap();
        (temp_dir, db, config)
    }

    fn body(result: &ToolsCallResult) -> Value {
        serde_json::from_str(&result.content[0].text).unwrap()
    }

    #[test]
    fn test_tool_definitions() {
        let names: Vec<_> = get_tool_definitions().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["kinship_resolve", "kinship_search_people", "kinship_stats", "kinship_relatives"]
        );
    }

    #[tokio::test]
    async fn test_resolve_simple_and_complex() {
        let (_tmp, db, config) = family_db().await;

        let result = handle_resolve(&db, &config, &json!({"person1": "رضا کریمی", "person2": "حسن کریمی"}))
            .await
            .unwrap();
        assert!(result.is_error.is_none());
        let json = body(&result);
        assert_eq!(json["type"], "simple");
        assert_eq!(json["relation"], "نوه");

        let result = handle_resolve(&db, &config, &json!({"person1": "6", "person2": "1", "by_id": true, "locale": "en"}))
            .await
            .unwrap();
        let json = body(&result);
        assert_eq!(json["type"], "complex");
        assert_eq!(json["relationships"], json!(["spouse", "child", "child"]));
    }

    #[tokio::test]
    async fn test_resolve_errors_are_tool_errors() {
        let (_tmp, db, config) = family_db().await;

        let result = handle_resolve(&db, &config, &json!({"person1": "حسن کریمی", "person2": "Stranger"}))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(body(&result)["kind"], "no_relation_found");

        let result = handle_resolve(&db, &config, &json!({"person1": "nobody", "person2": "Stranger"}))
            .await
            .unwrap();
        assert_eq!(body(&result)["kind"], "lookup_error");

        let bad_args = handle_resolve(&db, &config, &json!({"person1": "x"})).await;
        assert!(matches!(bad_args, Err(KinmcpError::InvalidInput(_))));

        let bad_locale = handle_resolve(&db, &config, &json!({"person1": "x", "person2": "y", "locale": "de"})).await;
        assert!(matches!(bad_locale, Err(KinmcpError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_search_people_uses_configured_limit() {
        let (_tmp, db, config) = family_db().await;

        let json = body(&handle_search_people(&db, &config, &json!({"query": "کریمی"})).await.unwrap());
        assert_eq!(json["count"], 2);
        assert_eq!(json["total"], 6);
        assert_eq!(json["persons"][0]["fullName"], "حسن کریمی");

        let json = body(&handle_search_people(&db, &config, &json!({"query": "کریمی", "limit": 10})).await.unwrap());
        assert_eq!(json["count"], 4);
    }

    #[tokio::test]
    async fn test_stats() {
        let (_tmp, db, _config) = family_db().await;
        let json = body(&handle_stats(&db).await.unwrap());
        assert_eq!(json["total"], 6);
        assert_eq!(json["men"], 3);
        assert_eq!(json["women"], 3);
        // reciprocal links mark 2 and 4 as married too
        assert_eq!(json["married"], 4);
    }

    #[tokio::test]
    async fn test_relatives_within_depth() {
        let (_tmp, db, config) = family_db().await;

        let json = body(&handle_relatives(&db, &config, &json!({"person": "3", "by_id": true, "max_depth": 1, "locale": "en"})).await.unwrap());
        let ids: Vec<_> = json["relatives"].as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap().to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
        assert_eq!(json["relatives"][0]["relation"], "father");
        assert_eq!(json["relatives"][2]["relation"], "child");

        let missing = handle_relatives(&db, &config, &json!({"person": "nobody"})).await.unwrap();
        assert_eq!(missing.is_error, Some(true));
        assert_eq!(missing.content[0].text, "یکی از افراد پیدا نشد: nobody");

        let missing = handle_relatives(&db, &config, &json!({"person": "nobody", "locale": "en"})).await.unwrap();
        assert_eq!(missing.content[0].text, "One of the people was not found: nobody");
    }
}
