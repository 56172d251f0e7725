use jsonc_parser::ast;
use jsonc_parser::common::Range;
use serde::Serialize;

/// One snippet offered inside the `tasks` array of a tasks.json file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub label: &'static str,
    pub documentation: &'static str,
    pub insert_text: &'static str,
}

/// Offers the launch-task snippet catalog when the innermost node at
/// `offset` is an array that is the value of a property named `tasks`.
pub fn provide_task_completions(text: &str, offset: usize) -> Vec<Completion> {
    let Ok(parsed) = jsonc_parser::parse_to_ast(
        text,
        &jsonc_parser::CollectOptions {
            comments: jsonc_parser::CommentCollectionStrategy::Off,
            tokens: false,
        },
        &Default::default(),
    ) else {
        return Vec::new();
    };
    let Some(root) = parsed.value else {
        return Vec::new();
    };
    if in_tasks_array(&root, offset) {
        catalog()
    } else {
        Vec::new()
    }
}

fn contains(range: &Range, offset: usize) -> bool {
    range.start <= offset && offset < range.end
}

fn value_range<'a>(value: &'a ast::Value) -> &'a Range {
    match value {
        ast::Value::StringLit(v) => &v.range,
        ast::Value::NumberLit(v) => &v.range,
        ast::Value::BooleanLit(v) => &v.range,
        ast::Value::Object(v) => &v.range,
        ast::Value::Array(v) => &v.range,
        ast::Value::NullKeyword(v) => &v.range,
    }
}

fn prop_name<'a>(name: &'a ast::ObjectPropName<'a>) -> &'a str {
    match name {
        ast::ObjectPropName::String(s) => s.value.as_ref(),
        ast::ObjectPropName::Word(w) => w.value,
    }
}

// Mirrors a findNodeAtOffset walk: descend to the innermost node holding
// the offset and report whether that node is the value array of a "tasks"
// property.
fn in_tasks_array(value: &ast::Value, offset: usize) -> bool {
    match value {
        ast::Value::Object(object) => {
            for prop in &object.properties {
                if !contains(&prop.range, offset) {
                    continue;
                }
                if !contains(value_range(&prop.value), offset) {
                    // the offset sits on the property name
                    return false;
                }
                if let ast::Value::Array(array) = &prop.value {
                    if let Some(element) = array
                        .elements
                        .iter()
                        .find(|element| contains(value_range(element), offset))
                    {
                        return in_tasks_array(element, offset);
                    }
                    return prop_name(&prop.name) == "tasks";
                }
                return in_tasks_array(&prop.value, offset);
            }
            false
        }
        ast::Value::Array(array) => array
            .elements
            .iter()
            .find(|element| contains(value_range(element), offset))
            .map(|element| in_tasks_array(element, offset))
            .unwrap_or(false),
        _ => false,
    }
}

fn catalog() -> Vec<Completion> {
    vec![
        Completion {
            label: "Start Camel application with camel:debug Maven goal",
            documentation: "Start Camel application with camel:debug Maven goal. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask. It requires Camel 3.18+.",
            insert_text: r#"{
	"label": "Start Camel application with camel:debug Maven goal",
	"type": "shell",
	"command": "mvn", // mvn binary of Maven must be available on command-line
	"args": [
		"camel:debug"
	],
	"options": {
		"env": {
			"CAMEL_DEBUGGER_SUSPEND": "true" // Set to true by default. A debugger must be attached for message to be processed.
		}
	},
	"problemMatcher": "$camel.debug.problemMatcher",
	"presentation": {
		"reveal": "always"
	},
	"isBackground": true // Must be set as background as the Maven commands doesn't return until the Camel application stops.
}"#,
        },
        Completion {
            label: "Start Camel application with Maven with camel.debug profile",
            documentation: "Start Camel application with camel.debug profile. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask.",
            insert_text: r#"{
	"label": "Start Camel application with camel.debug profile",
	"type": "shell",
	"command": "mvn", // mvn binary of Maven must be available on command-line
	"args": [
		"camel:run",
		"'-Pcamel.debug'" // This depends on your project. The goal here is to have camel-debug on the classpath.
	],
	"problemMatcher": "$camel.debug.problemMatcher",
	"presentation": {
		"reveal": "always"
	},
	"isBackground": true // Must be set as background as the Maven commands doesn't return until the Camel application stops.
}"#,
        },
        Completion {
            label: "Start Camel application with Maven Quarkus Dev with camel.debug profile",
            documentation: "Start Camel application with Maven Quarkus dev and camel.debug profile. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask.",
            insert_text: r#"{
	"label": "Start Camel application with Maven Quarkus Dev with camel.debug profile",
	"type": "shell",
	"command": "mvn", // mvn binary of Maven must be available on command-line
	"args": [
		"compile",
		"quarkus:dev",
		"'-Pcamel.debug'" // This depends on your project. The goal here is to have camel-debug on the classpath.
	],
	"problemMatcher": "$camel.debug.problemMatcher",
	"presentation": {
		"reveal": "always"
	},
	"isBackground": true // Must be set as background as the Maven commands doesn't return until the Camel application stops.
}"#,
        },
        Completion {
            label: "Launch Camel test with Maven with camel.debug profile",
            documentation: "Launch Camel test with camel.debug profile. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask. A single test can be launch at the same time.",
            insert_text: r#"{
	"label": "Launch Camel test with Maven with camel.debug profile",
	"type": "shell",
	"command": "mvn", // mvn binary of Maven must be available on command-line
	"args": [
		"test",
		"-Dtest=*", // If more than one test is present, a specific one must be specified as a single test can be Camel debugged per launch.
		"'-Pcamel.debug'" // This depends on your project. The goal here is to have camel-debug on the classpath.
	],
	"options": {
		"env": {
			"CAMEL_DEBUGGER_SUSPEND": "true" // Set to true by default. A debugger must be attached for message to be processed.
		}
	},
	"problemMatcher": "$camel.debug.problemMatcher",
	"presentation": {
		"reveal": "always"
	},
	"isBackground": true // Must be set as background as the Maven commands doesn't return until the Camel application stops.
}"#,
        },
        Completion {
            label: "Build a Camel Quarkus application as a Native executable debug-ready",
            documentation: "Build a native Quarkus application with JMX and Camel Debugger enabled. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask.",
            insert_text: r#"{
	"label": "Build a Camel Quarkus application as a Native executable debug-ready",
	"detail": "This task will build Camel Quarkus application with JMX and Camel Debugger enabled using GraalVM",
	"type": "shell",
	"command": "./mvnw",
	"args": [
		"install",
		"-Dnative",
		"'-Dquarkus.native.monitoring=jmxserver,jmxclient'",
		"'-Dquarkus.camel.debug.enabled=true'",
		"'-Pcamel.debug'" // This depends on your project
	],
	"problemMatcher": [],
	"presentation": {
		"reveal": "always"
	}
}"#,
        },
        Completion {
            label: "Start Camel native application debug-ready",
            documentation: "Start Camel native application with Maven Quarkus Native and camel.debug profile. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask.",
            insert_text: r#"{
	"label": "Start Camel native application debug-ready",
	"detail": "This task will start Camel native application with Maven Quarkus Native and camel.debug profile",
	"type": "shell",
	"command": "./target/*-runner",
	"problemMatcher": "$camel.debug.problemMatcher",
	"presentation": {
		"reveal": "always"
	},
	"isBackground": true
}"#,
        },
        Completion {
            label: "Run Camel application with JBang with camel-debug",
            documentation: "Start debuggable Camel application with JBang. It provides extra-configuration required to combine with a Camel Debugger launch configuration as a preLaunchTask.",
            insert_text: r#"{
	"label": "Run Camel application with JBang with camel-debug",
	"type": "shell",
	"command": "jbang", // jbang binary must be available on command-line
	"args": [
		"'-Dorg.apache.camel.debugger.suspend=true'", // requires Camel 3.18+ to take effect
		"'-Dcamel.jbang.version=4.5.0'", // to adapt to your Camel version. 3.16+ is required
		"camel@apache/camel",
		"run",
		"${relativeFile}", //to adapt to your workspace, using relativeFile means that the task must be launched when the file to start in debug in the active editor
		"--logging-level=info",
		"--reload",
		"'--dep=org.apache.camel:camel-debug'"
	],
	"problemMatcher": "$camel.debug.problemMatcher",
	"presentation": {
		"reveal": "always"
	},
	"isBackground": true // Must be set as background as the jbang command doesn't return until the Camel application stops.
}"#,
        },
    ]
}
