pub const QUIZ_GENERATOR_ROLE: &str =
    "You are an expert at writing educational multiple-choice quizzes.";

pub const SOURCE_ONLY_RULES: &str = "### Content Rules:

- Use ONLY the information written in the study material above.
- Do not use prior knowledge, general knowledge or any outside facts.
- Do not include anything in a question or an option that the study material does not state.
- Every question, option and explanation must be answerable directly from the study material.";

pub const QUIZ_JSON_SCHEMA: &str = r#"{
  "quizzes": [
    {
      "id": 1,
      "question": "Question text",
      "options": {
        "A": "Option A",
        "B": "Option B",
        "C": "Option C",
        "D": "Option D"
      },
      "correctAnswer": "A",
      "explanation": "Why the correct answer is correct",
      "optionExplanations": {
        "A": "Explanation for option A (why it is correct, if it is the answer)",
        "B": "Explanation for option B (why it is wrong, if it is not the answer)",
        "C": "Explanation for option C (why it is wrong, if it is not the answer)",
        "D": "Explanation for option D (why it is wrong, if it is not the answer)"
      }
    }
  ]
}"#;

pub const OUTPUT_FORMAT_RULES: &str = "- Write exactly four options labelled A, B, C and D for every question.
- Set correctAnswer to one of \"A\", \"B\", \"C\" or \"D\".
- In explanation, justify the correct answer using the study material.
- In optionExplanations, explain for every option why it is correct or why it is wrong.
- Base every explanation on the study material.
- Output pure JSON only, with no commentary and no code fences.";
