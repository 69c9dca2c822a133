use crate::models::StyleOptions;

pub const PRESERVE_SCENE_DIRECTIVE: &str =
    "Maintain the original background and lighting of the person's photo";

pub const RETURN_ONLY_DIRECTIVE: &str =
    "Return only the final composite image showing the person wearing the clothing.";

/// Builds the instruction text for one try-on. Same options, same text.
pub fn instruction_text(style: &StyleOptions) -> String {
    let garment = style.clothing_type.display_name();
    let garment_lower = garment.to_lowercase();
    let fit = style.fit_style.display_name();
    let fit_lower = fit.to_lowercase();
    let fit_description = style.fit_style.description();

    let mut steps = vec![
        "Analyze the person's body position, lighting, and proportions in the first image".to_string(),
        format!(
            "Take the {} from the second image and fit it onto the person",
            garment_lower
        ),
        format!("Apply a {} fit: {}", fit_lower, fit_description),
    ];
    if let Some(directive) = style.state_directive() {
        steps.push(directive.to_string());
    }
    steps.push(
        "Adjust the clothing's size, perspective, and lighting to match the person's photo".to_string(),
    );
    steps.push("Ensure the clothing drapes and fits according to the specified fit style".to_string());
    steps.push(PRESERVE_SCENE_DIRECTIVE.to_string());
    steps.push("Generate a high-quality, photorealistic composite image".to_string());

    let mut text = format!(
        "Create a photorealistic image showing the person from the first image wearing the {} from the second image.\n\n",
        garment_lower
    );
    text.push_str(&format!("Clothing Type: {}\n", garment));
    text.push_str(&format!("Fit Style: {}\n", fit));
    if style.clothing_type.supports_open_closed() {
        text.push_str(&format!("State: {}\n", style.clothing_state.display_name()));
    }
    text.push_str("\nInstructions:\n");
    for (i, step) in steps.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, step));
    }
    text.push_str(&format!(
        "\nImportant: The fit should be {} - {}\n\n",
        fit_lower, fit_description
    ));
    text.push_str(RETURN_ONLY_DIRECTIVE);
    text
}
